/// Message protocol between popup, background and content script
use serde::{Deserialize, Serialize};

use crate::coordinator::{TaskCoordinator, TaskStatus};
use crate::error::SummarizeError;
use crate::storage::SummaryStore;
use crate::summarizer::SummarizerHost;
use crate::summary::{Summary, TabId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    GetStatus {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    GetSummary {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    StartSummarization {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        #[serde(rename = "pageText")]
        page_text: String,
    },
    /// Answered by the content script, never by the background
    ExtractPageContent,
}

impl Request {
    pub fn handled_by_background(&self) -> bool {
        !matches!(self, Request::ExtractPageContent)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub needs_start: bool,
}

impl SummaryResponse {
    pub fn ok(summary: Summary) -> Self {
        SummaryResponse {
            success: true,
            summary: Some(summary),
            ..Default::default()
        }
    }

    pub fn failed(error: &SummarizeError) -> Self {
        SummaryResponse {
            success: false,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    pub fn needs_start() -> Self {
        SummaryResponse {
            success: false,
            needs_start: true,
            ..Default::default()
        }
    }
}

impl From<Result<Summary, SummarizeError>> for SummaryResponse {
    fn from(result: Result<Summary, SummarizeError>) -> Self {
        match result {
            Ok(summary) => SummaryResponse::ok(summary),
            Err(e) => SummaryResponse::failed(&e),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Response {
    Status(TaskStatus),
    Summary(SummaryResponse),
}

/// Route a request to the coordinator. `None` for requests meant for another surface.
pub async fn dispatch<S, H>(coordinator: &TaskCoordinator<S, H>, request: Request) -> Option<Response>
where
    S: SummaryStore,
    H: SummarizerHost + 'static,
{
    let response = match request {
        Request::GetStatus { tab_id } => Response::Status(coordinator.get_status(tab_id).await),
        Request::GetSummary { tab_id } => Response::Summary(match coordinator.get_summary(tab_id).await {
            Ok(Some(summary)) => SummaryResponse::ok(summary),
            Ok(None) => SummaryResponse::needs_start(),
            Err(e) => SummaryResponse::failed(&e),
        }),
        Request::StartSummarization { tab_id, page_text } => {
            Response::Summary(coordinator.start_summarization(tab_id, page_text).await.into())
        }
        Request::ExtractPageContent => return None,
    };
    Some(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SummarizerConfig;
    use crate::storage::MemoryStore;
    use crate::summarizer::testing::FakeHost;
    use futures::executor::block_on;
    use serde_json::json;

    fn coordinator() -> TaskCoordinator<MemoryStore, FakeHost> {
        TaskCoordinator::new(MemoryStore::new(), FakeHost::default(), SummarizerConfig::default())
    }

    fn to_json(response: Option<Response>) -> serde_json::Value {
        serde_json::to_value(response.unwrap()).unwrap()
    }

    #[test]
    fn test_parse_requests() {
        let request: Request = serde_json::from_value(json!({"action": "getStatus", "tabId": 12})).unwrap();
        assert_eq!(request, Request::GetStatus { tab_id: 12 });

        let request: Request = serde_json::from_value(json!({
            "action": "startSummarization",
            "tabId": 3,
            "pageText": "hello"
        }))
        .unwrap();
        assert_eq!(
            request,
            Request::StartSummarization {
                tab_id: 3,
                page_text: "hello".to_string()
            }
        );

        let request: Request = serde_json::from_value(json!({"action": "extractPageContent"})).unwrap();
        assert!(!request.handled_by_background());
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result = serde_json::from_value::<Request>(json!({"action": "selfDestruct", "tabId": 1}));
        assert!(result.is_err());
    }

    #[test]
    fn test_dispatch_status_none() {
        let coordinator = coordinator();

        let response = block_on(dispatch(&coordinator, Request::GetStatus { tab_id: 1 }));

        assert_eq!(to_json(response), json!({"status": "none"}));
    }

    #[test]
    fn test_dispatch_get_summary_needs_start() {
        let coordinator = coordinator();

        let response = block_on(dispatch(&coordinator, Request::GetSummary { tab_id: 1 }));

        assert_eq!(to_json(response), json!({"success": false, "needsStart": true}));
    }

    #[test]
    fn test_dispatch_start_then_status() {
        let coordinator = coordinator();
        let request = Request::StartSummarization {
            tab_id: 4,
            page_text: "x".repeat(150),
        };

        let started = to_json(block_on(dispatch(&coordinator, request)));
        assert_eq!(started["success"], true);
        assert_eq!(started["summary"]["headline"], "headline: 150");
        assert!(started.get("error").is_none());

        let status = to_json(block_on(dispatch(&coordinator, Request::GetStatus { tab_id: 4 })));
        assert_eq!(status["status"], "completed");
        assert_eq!(status["summary"], started["summary"]);
    }

    #[test]
    fn test_dispatch_reports_error_message() {
        let host = FakeHost {
            present: false,
            ..FakeHost::default()
        };
        let coordinator = TaskCoordinator::new(MemoryStore::new(), host, SummarizerConfig::default());
        let request = Request::StartSummarization {
            tab_id: 4,
            page_text: "x".repeat(150),
        };

        let response = to_json(block_on(dispatch(&coordinator, request)));

        assert_eq!(
            response,
            json!({
                "success": false,
                "error": "AI Summarizer API not available. Please use Chrome 138+ with AI features enabled."
            })
        );
    }

    #[test]
    fn test_dispatch_ignores_content_script_requests() {
        let coordinator = coordinator();

        assert!(block_on(dispatch(&coordinator, Request::ExtractPageContent)).is_none());
    }

    #[test]
    fn test_summary_response_round_trips_from_background() {
        let value = json!({"success": false, "needsStart": true});
        let response: SummaryResponse = serde_json::from_value(value).unwrap();

        assert_eq!(response, SummaryResponse::needs_start());
    }
}
