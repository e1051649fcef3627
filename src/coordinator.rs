/// Background task coordinator.
///
/// Two tiers of per-tab state:
/// - a volatile registry of in-flight jobs, lost when the service worker is
///   suspended (callers simply start a new job);
/// - a durable store of completed summaries that survives restarts.
///
/// Everything runs on one cooperative event loop, so the registry is a plain
/// `RefCell`. Borrows are never held across an await.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::SummarizerConfig;
use crate::error::SummarizeError;
use crate::storage::SummaryStore;
use crate::summarizer::{SummarizerHost, run_summarization};
use crate::summary::{Summary, SummaryPlan, TabId};

type JobFuture = Shared<LocalBoxFuture<'static, Result<Summary, SummarizeError>>>;

struct PendingTask {
    id: u64,
    job: JobFuture,
}

/// Status of a tab as seen by the popup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskStatus {
    Completed { summary: Summary },
    Pending,
    #[serde(rename = "none")]
    Absent,
}

pub struct TaskCoordinator<S, H> {
    store: S,
    host: Rc<H>,
    config: SummarizerConfig,
    pending: RefCell<HashMap<TabId, PendingTask>>,
    next_id: Cell<u64>,
}

impl<S, H> TaskCoordinator<S, H>
where
    S: SummaryStore,
    H: SummarizerHost + 'static,
{
    pub fn new(store: S, host: H, config: SummarizerConfig) -> Self {
        TaskCoordinator {
            store,
            host: Rc::new(host),
            config,
            pending: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_pending(&self, tab_id: TabId) -> bool {
        self.pending.borrow().contains_key(&tab_id)
    }

    async fn cached(&self, tab_id: TabId) -> Option<Summary> {
        match self.store.load(tab_id).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Cache lookup for tab {} failed: {}", tab_id, e);
                None
            }
        }
    }

    fn pending_job(&self, tab_id: TabId) -> Option<JobFuture> {
        self.pending.borrow().get(&tab_id).map(|task| task.job.clone())
    }

    /// Drop the registry entry if it still belongs to job `id`
    fn release(&self, tab_id: TabId, id: u64) -> bool {
        let mut pending = self.pending.borrow_mut();
        match pending.get(&tab_id) {
            Some(task) if task.id == id => {
                pending.remove(&tab_id);
                true
            }
            _ => false,
        }
    }

    fn is_current(&self, tab_id: TabId, id: u64) -> bool {
        self.pending
            .borrow()
            .get(&tab_id)
            .is_some_and(|task| task.id == id)
    }

    pub async fn get_status(&self, tab_id: TabId) -> TaskStatus {
        if let Some(summary) = self.cached(tab_id).await {
            return TaskStatus::Completed { summary };
        }
        if self.is_pending(tab_id) {
            return TaskStatus::Pending;
        }
        TaskStatus::Absent
    }

    /// Cached summary, or the result of the job already running for this tab.
    /// `Ok(None)` means nothing exists yet and the caller must start a job.
    pub async fn get_summary(&self, tab_id: TabId) -> Result<Option<Summary>, SummarizeError> {
        if let Some(summary) = self.cached(tab_id).await {
            debug!("Cache hit for tab {}", tab_id);
            return Ok(Some(summary));
        }

        match self.pending_job(tab_id) {
            Some(job) => {
                debug!("Waiting on pending job for tab {}", tab_id);
                job.await.map(Some)
            }
            None => Ok(None),
        }
    }

    pub async fn start_summarization(&self, tab_id: TabId, page_text: String) -> Result<Summary, SummarizeError> {
        if let Some(summary) = self.cached(tab_id).await {
            debug!("Cache hit for tab {}", tab_id);
            return Ok(summary);
        }

        // Lookup and registration happen with no await in between
        let (id, job, launched) = {
            let mut pending = self.pending.borrow_mut();
            match pending.get(&tab_id) {
                Some(task) => (task.id, task.job.clone(), false),
                None => {
                    let id = self.next_id.get();
                    self.next_id.set(id + 1);
                    let job = self.launch(page_text);
                    pending.insert(tab_id, PendingTask { id, job: job.clone() });
                    (id, job, true)
                }
            }
        };

        if !launched {
            debug!("Joining pending job for tab {}", tab_id);
            return job.await;
        }

        info!("Starting summarization for tab {}", tab_id);
        let outcome = job.await;

        match &outcome {
            Ok(summary) => {
                if self.is_current(tab_id, id) {
                    if let Err(e) = self.store.save(tab_id, summary).await {
                        warn!("Failed to cache summary for tab {}: {}", tab_id, e);
                    }
                    if !self.release(tab_id, id) {
                        // Tab closed while the summary was being written
                        let _ = self.store.remove(tab_id).await;
                    }
                    info!("Summarization finished for tab {}", tab_id);
                } else {
                    debug!("Tab {} closed before job finished, not caching", tab_id);
                }
            }
            Err(e) => {
                self.release(tab_id, id);
                error!("Summarization failed for tab {}: {}", tab_id, e);
            }
        }

        outcome
    }

    /// Forget everything about a closed tab
    pub async fn on_tab_removed(&self, tab_id: TabId) {
        self.pending.borrow_mut().remove(&tab_id);
        if let Err(e) = self.store.remove(tab_id).await {
            warn!("Failed to clear cached summary for tab {}: {}", tab_id, e);
        }
    }

    fn launch(&self, page_text: String) -> JobFuture {
        let host = self.host.clone();
        let plan = SummaryPlan::from_config(&self.config);
        async move { run_summarization(host.as_ref(), &plan, &page_text).await }
            .boxed_local()
            .shared()
    }
}
