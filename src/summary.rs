/// Summary data and the per-kind summarizer options
use serde::{Deserialize, Serialize};

use crate::config::SummarizerConfig;

/// Host-assigned browser tab handle
pub type TabId = i32;

/// A completed summary for one tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub headline: String,
    pub teaser: Option<String>,
    pub tldr: String,
    pub key_points: String,
    pub enable_teaser: bool,
}

/// One piece of a summary, produced by its own summarizer instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryKind {
    Headline,
    Teaser,
    Tldr,
    KeyPoints,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryType {
    Headline,
    Teaser,
    Tldr,
    KeyPoints,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryFormat {
    PlainText,
    Markdown,
}

/// Options passed to the host's `Summarizer.create`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummarizerOptions {
    #[serde(rename = "type")]
    pub summary_type: SummaryType,
    pub length: SummaryLength,
    pub format: SummaryFormat,
    pub output_language: String,
}

impl SummaryKind {
    fn summary_type(self) -> SummaryType {
        match self {
            SummaryKind::Headline => SummaryType::Headline,
            SummaryKind::Teaser => SummaryType::Teaser,
            SummaryKind::Tldr => SummaryType::Tldr,
            SummaryKind::KeyPoints => SummaryType::KeyPoints,
        }
    }

    fn length(self) -> SummaryLength {
        match self {
            SummaryKind::Headline | SummaryKind::Teaser => SummaryLength::Short,
            SummaryKind::Tldr | SummaryKind::KeyPoints => SummaryLength::Long,
        }
    }
}

/// The ordered set of summary kinds requested for one job
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPlan {
    kinds: Vec<SummaryKind>,
    output_language: String,
}

impl SummaryPlan {
    pub fn from_config(config: &SummarizerConfig) -> SummaryPlan {
        let mut kinds = vec![SummaryKind::Headline];
        if config.enable_teaser {
            kinds.push(SummaryKind::Teaser);
        }
        kinds.extend([SummaryKind::Tldr, SummaryKind::KeyPoints]);

        SummaryPlan {
            kinds,
            output_language: config.output_language.clone(),
        }
    }

    pub fn kinds(&self) -> &[SummaryKind] {
        &self.kinds
    }

    pub fn output_language(&self) -> &str {
        &self.output_language
    }

    pub fn teaser_enabled(&self) -> bool {
        self.kinds.contains(&SummaryKind::Teaser)
    }

    pub fn options_for(&self, kind: SummaryKind) -> SummarizerOptions {
        SummarizerOptions {
            summary_type: kind.summary_type(),
            length: kind.length(),
            format: SummaryFormat::PlainText,
            output_language: self.output_language.clone(),
        }
    }

    /// Build a summary from per-kind outputs; order of `outputs` does not matter
    pub fn assemble(&self, outputs: Vec<(SummaryKind, String)>) -> Summary {
        let enable_teaser = self.teaser_enabled();
        let mut summary = Summary {
            headline: String::new(),
            teaser: None,
            tldr: String::new(),
            key_points: String::new(),
            enable_teaser,
        };

        for (kind, text) in outputs {
            match kind {
                SummaryKind::Headline => summary.headline = text,
                SummaryKind::Teaser if enable_teaser => summary.teaser = Some(text),
                SummaryKind::Teaser => {}
                SummaryKind::Tldr => summary.tldr = text,
                SummaryKind::KeyPoints => summary.key_points = text,
            }
        }

        summary
    }
}
