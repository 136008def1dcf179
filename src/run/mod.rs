//! Run execution: dispatch, completion tracking and collection.
//!
//! A run submits one task per request, then the calling task becomes the single
//! collector: it drains completions from a channel, files them in the response
//! store and counts them down on the tracker until the run is complete. Only the
//! collector touches the store, so no lock is involved.

mod task;
mod tracker;

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{error, info};
use tokio::sync::mpsc;

use crate::aggregate::aggregate_bodies;
use crate::config::HTTP_STATUS_OK;
use crate::error_handling::{AggregatorError, FailureStats};
use crate::fetch::{build_requests, RequestBatch, Timeouts, Transport};
use crate::store::ResponseStore;

pub use tracker::{CompletionTracker, TrackerState};

/// Summary statistics of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Number of requests dispatched
    pub total_requests: usize,
    /// Completions recorded with status 200
    pub successful: usize,
    /// All other completions (other statuses and transport failures)
    pub failed: usize,
    /// Wall-clock time from first submission to the last completion
    pub elapsed: Duration,
}

impl RunReport {
    fn new(total_requests: usize, store: &ResponseStore, elapsed: Duration) -> Self {
        let successful = store.successes().len();
        Self {
            total_requests,
            successful,
            failed: store.total() - successful,
            elapsed,
        }
    }
}

/// One execution of a batch, terminal once returned by `execute_run`.
#[derive(Debug)]
pub struct Run {
    batch: RequestBatch,
    tracker: CompletionTracker,
    store: ResponseStore,
    cache: Option<String>,
    report: RunReport,
}

impl Run {
    /// The batch this run executed.
    pub fn batch(&self) -> &RequestBatch {
        &self.batch
    }

    /// Tracker of this run, always `Complete` once returned.
    pub fn tracker(&self) -> &CompletionTracker {
        &self.tracker
    }

    /// Every completion of this run, by status.
    pub fn store(&self) -> &ResponseStore {
        &self.store
    }

    /// Counts and timing.
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// The aggregate of this run's 200 bodies, computed on first call.
    ///
    /// Failures are not cached, so a later call tries again.
    pub fn aggregate(&mut self) -> Result<&str, AggregatorError> {
        let aggregate = match self.cache.take() {
            Some(cached) => cached,
            None => aggregate_bodies(self.store.successes())?,
        };
        Ok(self.cache.insert(aggregate).as_str())
    }

    /// Whether `aggregate` has already succeeded.
    pub fn is_aggregate_cached(&self) -> bool {
        self.cache.is_some()
    }
}

/// Dispatches every request of `batch` and collects all completions.
///
/// Must be called from within a Tokio runtime. Returns once every dispatched
/// request has completed (response or transport failure); there is no run-level
/// deadline beyond the per-request timeouts. A request whose task panics is
/// recorded as a transport failure of kind `Other`.
///
/// # Errors
///
/// Returns `AggregatorError::Configuration` before any request is issued if the
/// batch's method is not GET. Nothing that happens to individual requests is an
/// error here.
pub async fn execute_run<T: Transport>(
    transport: Arc<T>,
    batch: RequestBatch,
    timeouts: Timeouts,
) -> Result<Run, AggregatorError> {
    let requests = build_requests(&batch, timeouts)?;
    let total_requests = requests.len();
    info!("Starting run: {} request(s)", total_requests);

    let start = Instant::now();
    let tracker = CompletionTracker::new();
    let mut store = ResponseStore::new();
    let failure_stats = FailureStats::new();
    let (completions_tx, mut completions_rx) = mpsc::unbounded_channel();

    tracker.start();
    for request in requests {
        tracker.register();
        let slot = task::CompletionSlot::new(request.url.clone(), completions_tx.clone());
        tokio::spawn(task::fetch_one(Arc::clone(&transport), request, slot));
    }
    drop(completions_tx);
    tracker.seal();

    loop {
        tokio::select! {
            biased;
            () = tracker.wait() => break,
            completion = completions_rx.recv() => match completion {
                Some(completion) => {
                    if let Err(failure) = &completion {
                        failure_stats.increment(failure.kind);
                    }
                    store.record_completion(completion);
                    tracker.complete_one();
                }
                // Only reachable if a slot was leaked without reporting
                None => {
                    error!(
                        "{} request(s) ended without reporting a completion",
                        tracker.in_flight()
                    );
                    break;
                }
            },
        }
    }

    let report = RunReport::new(total_requests, &store, start.elapsed());
    info!(
        "Run complete: {} request(s) ({} with status {}, {} other) in {:.2}s",
        report.total_requests,
        report.successful,
        HTTP_STATUS_OK,
        report.failed,
        report.elapsed.as_secs_f64()
    );
    failure_stats.log_summary();

    Ok(Run {
        batch,
        tracker,
        store,
        cache: None,
        report,
    })
}
