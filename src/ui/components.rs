/// Reusable UI components for rendering a summary

use std::sync::LazyLock;

use regex::Regex;
use yew::prelude::*;

use crate::summary::Summary;

static BULLET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s+").expect("valid bullet pattern"));

/// One list item per non-empty line, with leading bullet markers removed
pub fn split_key_points(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| BULLET_PREFIX.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Non-empty lines of a plain-text block
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[derive(Properties, PartialEq)]
pub struct TextBlockProps {
    pub text: String,
    #[prop_or_default]
    pub class: Classes,
}

#[function_component(TextBlock)]
pub fn text_block(props: &TextBlockProps) -> Html {
    html! {
        <div class={props.class.clone()}>
            {for paragraphs(&props.text).into_iter().map(|line| html! {
                <p class="summary-paragraph">{line}</p>
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct KeyPointListProps {
    pub text: String,
}

#[function_component(KeyPointList)]
pub fn key_point_list(props: &KeyPointListProps) -> Html {
    html! {
        <ul class="key-points">
            {for split_key_points(&props.text).into_iter().map(|point| html! {
                <li class="key-point">{point}</li>
            })}
        </ul>
    }
}

#[derive(Properties, PartialEq)]
pub struct SummaryViewProps {
    pub summary: Summary,
}

#[function_component(SummaryView)]
pub fn summary_view(props: &SummaryViewProps) -> Html {
    let summary = &props.summary;

    html! {
        <div class="summary">
            <h2 class="summary-headline">{&summary.headline}</h2>

            if summary.enable_teaser {
                if let Some(teaser) = &summary.teaser {
                    <p class="summary-teaser">{teaser}</p>
                }
            }

            <h3 class="summary-section-title">{"TL;DR"}</h3>
            <TextBlock text={summary.tldr.clone()} class={classes!("summary-tldr")} />

            <h3 class="summary-section-title">{"Key points"}</h3>
            <KeyPointList text={summary.key_points.clone()} />
        </div>
    }
}
