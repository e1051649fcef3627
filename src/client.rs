/// Popup side of the protocol: talks to the background and the page

use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;

use crate::chrome;
use crate::config::RetryPolicy;
use crate::coordinator::TaskStatus;
use crate::error::{PopupError, TransportError};
use crate::extract::prepare_page_text;
use crate::messages::{Request, SummaryResponse};
use crate::summary::{Summary, TabId};
use crate::tab_data::TabInfo;

/// Message channel to the background coordinator
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: &Request) -> Result<serde_json::Value, TransportError>;
    async fn pause(&self, millis: u32);
}

/// Source of the active tab's text
#[async_trait(?Send)]
pub trait PageSource {
    async fn page_text(&self, tab_id: TabId) -> Result<String, PopupError>;
}

/// Send `request` up to `policy.max_attempts` times, pausing between tries
pub async fn with_retry<T: Transport>(
    transport: &T,
    policy: &RetryPolicy,
    request: &Request,
) -> Result<serde_json::Value, TransportError> {
    let mut attempt = 1;
    loop {
        match transport.send(request).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_attempts => {
                warn!("Message attempt {} failed: {}", attempt, e);
                transport.pause(policy.backoff_ms).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

pub struct SummaryClient<T, P> {
    transport: T,
    page: P,
    retry: RetryPolicy,
}

impl<T: Transport, P: PageSource> SummaryClient<T, P> {
    pub fn new(transport: T, page: P, retry: RetryPolicy) -> Self {
        SummaryClient { transport, page, retry }
    }

    async fn call<R: DeserializeOwned>(&self, request: &Request) -> Result<R, TransportError> {
        let value = with_retry(&self.transport, &self.retry, request).await?;
        serde_json::from_value(value).map_err(|e| TransportError::Decode(e.to_string()))
    }

    fn into_summary(response: SummaryResponse) -> Result<Option<Summary>, PopupError> {
        match response {
            SummaryResponse { needs_start: true, .. } => Ok(None),
            SummaryResponse {
                success: true,
                summary: Some(summary),
                ..
            } => Ok(Some(summary)),
            SummaryResponse { error, .. } => Err(PopupError::Remote(
                error.unwrap_or_else(|| "Summarization failed".to_string()),
            )),
        }
    }

    /// Show what exists for the tab, otherwise extract its text and start a job
    pub async fn fetch_summary(&self, tab_id: TabId) -> Result<Summary, PopupError> {
        let status: TaskStatus = self.call(&Request::GetStatus { tab_id }).await?;

        match status {
            TaskStatus::Completed { summary } => return Ok(summary),
            TaskStatus::Pending => {
                debug!("Summary for tab {} in progress, waiting", tab_id);
                let response = self.call(&Request::GetSummary { tab_id }).await?;
                if let Some(summary) = Self::into_summary(response)? {
                    return Ok(summary);
                }
            }
            TaskStatus::Absent => {}
        }

        let raw = self.page.page_text(tab_id).await?;
        let page_text = prepare_page_text(&raw)?;

        let response = self
            .call(&Request::StartSummarization { tab_id, page_text })
            .await?;
        Self::into_summary(response)?
            .ok_or_else(|| PopupError::Remote("Summarization did not start".to_string()))
    }
}

/// `chrome.runtime.sendMessage`
pub struct RuntimeTransport;

#[async_trait(?Send)]
impl Transport for RuntimeTransport {
    async fn send(&self, request: &Request) -> Result<serde_json::Value, TransportError> {
        let message = to_js(request).map_err(TransportError::Send)?;
        let response = chrome::runtime_send_message(message)
            .await
            .map_err(|e| TransportError::Send(chrome::error_message(&e)))?;

        if response.is_undefined() || response.is_null() {
            return Err(TransportError::NoResponse);
        }
        serde_wasm_bindgen::from_value(response).map_err(|e| TransportError::Decode(e.to_string()))
    }

    async fn pause(&self, millis: u32) {
        TimeoutFuture::new(millis).await;
    }
}

/// Injects the content script into the tab and asks it for the page text
pub struct ContentScriptPage {
    pub script_file: &'static str,
}

#[derive(Serialize)]
struct Injection<'a> {
    target: InjectionTarget,
    files: [&'a str; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InjectionTarget {
    tab_id: TabId,
}

#[async_trait(?Send)]
impl PageSource for ContentScriptPage {
    async fn page_text(&self, tab_id: TabId) -> Result<String, PopupError> {
        let injection = to_js(&Injection {
            target: InjectionTarget { tab_id },
            files: [self.script_file],
        })
        .map_err(PopupError::Extraction)?;

        chrome::execute_script(injection)
            .await
            .map_err(|e| PopupError::Extraction(chrome::error_message(&e)))?;

        let request = to_js(&Request::ExtractPageContent).map_err(PopupError::Extraction)?;
        let text = chrome::tabs_send_message(tab_id, request)
            .await
            .map_err(|e| PopupError::Extraction(chrome::error_message(&e)))?;

        Ok(text.as_string().unwrap_or_default())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActiveTabQuery {
    active: bool,
    current_window: bool,
}

/// The focused tab of the current window
pub async fn active_tab() -> Result<TabInfo, PopupError> {
    let query = to_js(&ActiveTabQuery {
        active: true,
        current_window: true,
    })
    .map_err(|_| PopupError::NoActiveTab)?;

    let tabs_js = chrome::tabs_query(query).await.map_err(|_| PopupError::NoActiveTab)?;
    let tabs: Vec<TabInfo> = serde_wasm_bindgen::from_value(tabs_js).map_err(|_| PopupError::NoActiveTab)?;
    tabs.into_iter().next().ok_or(PopupError::NoActiveTab)
}

pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| format!("Failed to serialize: {:?}", e))
}
