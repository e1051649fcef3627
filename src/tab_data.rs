/// Browser tab as returned by chrome.tabs.query
use serde::{Deserialize, Serialize};

use crate::summary::TabId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabInfo {
    pub id: TabId,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl TabInfo {
    /// Pages where extensions cannot inject scripts
    pub fn is_restricted(&self) -> bool {
        self.url.as_deref().is_some_and(|url| {
            ["chrome://", "chrome-extension://", "edge://", "about:", "https://chrome.google.com/webstore"]
                .iter()
                .any(|prefix| url.starts_with(prefix))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_chrome_tab() {
        let json = r#"{"id": 17, "url": "https://example.com/post", "title": "Post", "pinned": false, "index": 3}"#;

        let tab: TabInfo = serde_json::from_str(json).unwrap();

        assert_eq!(tab.id, 17);
        assert_eq!(tab.url.as_deref(), Some("https://example.com/post"));
        assert!(!tab.is_restricted());
    }

    #[test]
    fn test_tab_without_url_permission() {
        let tab: TabInfo = serde_json::from_str(r#"{"id": 2}"#).unwrap();

        assert_eq!(tab.url, None);
        assert!(!tab.is_restricted());
    }

    #[test]
    fn test_restricted_pages() {
        let tab = TabInfo {
            id: 1,
            url: Some("chrome://settings".to_string()),
            title: None,
        };

        assert!(tab.is_restricted());
    }
}
