/// Summarization job: availability checks and parallel summarizer calls

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, info, warn};
use serde::Serialize;
use wasm_bindgen::JsCast;

use crate::chrome;
use crate::error::SummarizeError;
use crate::summary::{Summary, SummaryKind, SummaryPlan, SummarizerOptions};

/// Readiness of the on-device model as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Unavailable,
    Downloadable,
    Downloading,
    Available,
}

impl Availability {
    pub fn parse(value: &str) -> Option<Availability> {
        match value {
            "unavailable" => Some(Availability::Unavailable),
            "downloadable" => Some(Availability::Downloadable),
            "downloading" => Some(Availability::Downloading),
            "available" | "readily" => Some(Availability::Available),
            _ => None,
        }
    }
}

/// A summarizer instance created by the host
#[async_trait(?Send)]
pub trait SummarizerSession {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError>;
    fn destroy(&self);
}

/// The host's summarization capability
#[async_trait(?Send)]
pub trait SummarizerHost {
    type Session: SummarizerSession;

    fn is_present(&self) -> bool;
    async fn availability(&self) -> Result<Availability, SummarizeError>;
    /// Start (and wait for) the model download
    async fn download(&self, output_language: &str) -> Result<(), SummarizeError>;
    async fn create(&self, options: &SummarizerOptions) -> Result<Self::Session, SummarizeError>;
}

async fn ensure_ready<H: SummarizerHost>(host: &H, output_language: &str) -> Result<(), SummarizeError> {
    if !host.is_present() {
        return Err(SummarizeError::ApiNotPresent);
    }

    match host.availability().await? {
        Availability::Unavailable => Err(SummarizeError::Unavailable),
        Availability::Downloadable | Availability::Downloading => {
            info!("Summarizer model not ready, waiting for download");
            host.download(output_language).await.map_err(|e| {
                warn!("Model download failed: {}", e);
                SummarizeError::ModelDownloading
            })
        }
        Availability::Available => Ok(()),
    }
}

fn destroy_all<S: SummarizerSession>(sessions: &[(SummaryKind, S)]) {
    for (_, session) in sessions {
        session.destroy();
    }
}

/// Run every summarizer in `plan` over `text` and assemble the result.
///
/// Either all kinds succeed or the whole job fails; created instances are
/// always destroyed.
pub async fn run_summarization<H: SummarizerHost>(
    host: &H,
    plan: &SummaryPlan,
    text: &str,
) -> Result<Summary, SummarizeError> {
    ensure_ready(host, plan.output_language()).await?;

    let created = join_all(plan.kinds().iter().map(|&kind| {
        let options = plan.options_for(kind);
        async move { host.create(&options).await.map(|session| (kind, session)) }
    }))
    .await;

    let mut sessions = Vec::with_capacity(created.len());
    let mut failure = None;
    for result in created {
        match result {
            Ok(session) => sessions.push(session),
            Err(e) => {
                failure.get_or_insert(e);
            }
        }
    }
    if let Some(err) = failure {
        destroy_all(&sessions);
        return Err(err);
    }
    debug!("Created {} summarizers", sessions.len());

    let outputs = join_all(
        sessions
            .iter()
            .map(|(kind, session)| async move { session.summarize(text).await.map(|out| (*kind, out)) }),
    )
    .await;
    destroy_all(&sessions);

    let outputs = outputs.into_iter().collect::<Result<Vec<_>, _>>()?;
    Ok(plan.assemble(outputs))
}

/// `Summarizer` global of the hosting browser
#[derive(Debug, Default, Clone, Copy)]
pub struct ChromeSummarizer;

pub struct ChromeSession(chrome::Summarizer);

fn host_error(err: wasm_bindgen::JsValue) -> SummarizeError {
    SummarizeError::HostCall(chrome::error_message(&err))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DownloadOptions<'a> {
    output_language: &'a str,
}

#[async_trait(?Send)]
impl SummarizerSession for ChromeSession {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let result = self.0.summarize(text).await.map_err(host_error)?;
        Ok(result.as_string().unwrap_or_default())
    }

    fn destroy(&self) {
        self.0.destroy();
    }
}

#[async_trait(?Send)]
impl SummarizerHost for ChromeSummarizer {
    type Session = ChromeSession;

    fn is_present(&self) -> bool {
        chrome::summarizer_present()
    }

    async fn availability(&self) -> Result<Availability, SummarizeError> {
        let value = chrome::Summarizer::availability().await.map_err(host_error)?;
        let tier = value.as_string().unwrap_or_default();
        Availability::parse(&tier)
            .ok_or_else(|| SummarizeError::HostCall(format!("Unknown availability: {}", tier)))
    }

    async fn download(&self, output_language: &str) -> Result<(), SummarizeError> {
        let options = serde_wasm_bindgen::to_value(&DownloadOptions { output_language })
            .map_err(|e| SummarizeError::HostCall(e.to_string()))?;
        let instance: chrome::Summarizer = chrome::Summarizer::create(options)
            .await
            .map_err(host_error)?
            .unchecked_into();
        instance.destroy();
        Ok(())
    }

    async fn create(&self, options: &SummarizerOptions) -> Result<ChromeSession, SummarizeError> {
        let options = serde_wasm_bindgen::to_value(options)
            .map_err(|e| SummarizeError::HostCall(e.to_string()))?;
        let instance = chrome::Summarizer::create(options).await.map_err(host_error)?;
        Ok(ChromeSession(instance.unchecked_into()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::{Cell, RefCell};
    use std::future::Future;
    use std::pin::Pin;
    use std::rc::Rc;
    use std::task::{Context, Poll};

    use futures::channel::oneshot;

    use super::*;

    /// Returns `Pending` once before completing
    pub struct YieldNow(bool);

    impl Future for YieldNow {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    pub fn yield_now() -> YieldNow {
        YieldNow(false)
    }

    #[derive(Default)]
    pub struct Counters {
        pub created: Cell<usize>,
        pub summarized: Cell<usize>,
        pub destroyed: Cell<usize>,
        pub downloads: Cell<usize>,
    }

    /// Scripted host: echoes the summary type, optionally failing or blocking
    pub struct FakeHost {
        pub present: bool,
        pub availability: Availability,
        pub download_fails: bool,
        pub fail_create: Option<SummaryKind>,
        pub fail_summarize: Option<String>,
        pub gate: RefCell<Option<oneshot::Receiver<()>>>,
        pub counters: Rc<Counters>,
    }

    impl Default for FakeHost {
        fn default() -> Self {
            FakeHost {
                present: true,
                availability: Availability::Available,
                download_fails: false,
                fail_create: None,
                fail_summarize: None,
                gate: RefCell::new(None),
                counters: Rc::new(Counters::default()),
            }
        }
    }

    impl FakeHost {
        /// Summaries block until the returned sender fires (or is dropped)
        pub fn gated() -> (FakeHost, oneshot::Sender<()>) {
            let (tx, rx) = oneshot::channel();
            let host = FakeHost {
                gate: RefCell::new(Some(rx)),
                ..FakeHost::default()
            };
            (host, tx)
        }
    }

    pub struct FakeSession {
        label: String,
        fail: Option<String>,
        counters: Rc<Counters>,
    }

    #[async_trait(?Send)]
    impl SummarizerSession for FakeSession {
        async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
            self.counters.summarized.set(self.counters.summarized.get() + 1);
            yield_now().await;
            if let Some(message) = &self.fail {
                return Err(SummarizeError::HostCall(message.clone()));
            }
            Ok(format!("{}: {}", self.label, text.len()))
        }

        fn destroy(&self) {
            self.counters.destroyed.set(self.counters.destroyed.get() + 1);
        }
    }

    #[async_trait(?Send)]
    impl SummarizerHost for FakeHost {
        type Session = FakeSession;

        fn is_present(&self) -> bool {
            self.present
        }

        async fn availability(&self) -> Result<Availability, SummarizeError> {
            Ok(self.availability)
        }

        async fn download(&self, _output_language: &str) -> Result<(), SummarizeError> {
            self.counters.downloads.set(self.counters.downloads.get() + 1);
            if self.download_fails {
                Err(SummarizeError::HostCall("network".to_string()))
            } else {
                Ok(())
            }
        }

        async fn create(&self, options: &SummarizerOptions) -> Result<FakeSession, SummarizeError> {
            if let Some(kind) = self.fail_create {
                let plan_options = SummaryPlan::from_config(&Default::default()).options_for(kind);
                if plan_options.summary_type == options.summary_type {
                    return Err(SummarizeError::HostCall("create failed".to_string()));
                }
            }
            self.counters.created.set(self.counters.created.get() + 1);

            // The first session created takes the gate; the job waits on it
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }

            Ok(FakeSession {
                label: serde_json::to_value(options.summary_type)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default(),
                fail: self.fail_summarize.clone(),
                counters: self.counters.clone(),
            })
        }
    }
}
