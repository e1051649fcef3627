/// Runtime configuration for the summarizer and the popup transport
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SummarizerConfig {
    /// Request an extra short "teaser" alongside the headline
    pub enable_teaser: bool,
    pub output_language: String,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        SummarizerConfig {
            enable_teaser: false,
            output_language: "en".to_string(),
        }
    }
}

/// Retry policy for popup → background messages.
///
/// The service worker may be suspended when the popup opens; the first send
/// can fail while it wakes up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            backoff_ms: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SummarizerConfig::default();
        assert!(!config.enable_teaser);
        assert_eq!(config.output_language, "en");

        let retry = RetryPolicy::default();
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.backoff_ms, 100);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SummarizerConfig = serde_json::from_str(r#"{"enableTeaser":true}"#).unwrap();

        assert!(config.enable_teaser);
        assert_eq!(config.output_language, "en");
    }
}
