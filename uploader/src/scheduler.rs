//! Upload scheduler.
//!
//! Runs one job per accepted file. Job `i` uploads the file at position `i`
//! and writes only to index `i` of the tracker.
//!
//! ```text
//!  accepted files ──▶ admit (policy) ──▶ Transport::upload ──▶ succeed / fail
//!                        ▲                                           │
//!                        └────────── slot freed on completion ◀──────┘
//! ```
//!
//! # Policies
//!
//! - [`SchedulePolicy::Sequential`] - one job at a time, each fully finished
//!   (bookkeeping included) before the next starts.
//! - [`SchedulePolicy::Windowed`] - up to `n` jobs in flight; when the window
//!   is full the scheduler waits for any job to finish before admitting the
//!   next one, then drains the window at the end.
//!
//! All jobs are polled on the calling task. Nothing is spawned, so the same
//! code runs under tokio and in the browser.

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;

use crate::config::{UploadConfig, DEFAULT_CONCURRENCY};
use crate::models::{CandidateFile, JobStatus};
use crate::notify::{Notification, Notifier};
use crate::state::UploadTracker;
use crate::transport::Transport;

/// How jobs are admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulePolicy {
    /// Strictly one after another
    Sequential,
    /// At most this many in flight
    Windowed(usize),
}

impl SchedulePolicy {
    /// Maximum number of jobs in flight.
    pub fn window(&self) -> usize {
        match self {
            SchedulePolicy::Sequential => 1,
            SchedulePolicy::Windowed(n) => (*n).max(1),
        }
    }
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        SchedulePolicy::Windowed(DEFAULT_CONCURRENCY)
    }
}

/// Final state of one job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobOutcome {
    pub index: usize,
    pub name: String,
    pub status: JobStatus,
    pub preview_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Ordered by job index
    pub jobs: Vec<JobOutcome>,
}

impl BatchReport {
    fn from_outcomes(mut jobs: Vec<JobOutcome>) -> Self {
        jobs.sort_by_key(|j| j.index);
        let succeeded = jobs.iter().filter(|j| j.status == JobStatus::Succeeded).count();
        Self {
            total: jobs.len(),
            succeeded,
            failed: jobs.len() - succeeded,
            jobs,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Upload every file and wait until each job is terminal.
///
/// The tracker must already hold one pending job per file (see
/// [`UploadTracker::reset`]). Failures are reported through `notifier` and
/// never stop sibling jobs.
pub async fn run_batch<T, N>(
    files: &[CandidateFile<T::Content>],
    transport: &T,
    config: &UploadConfig,
    tracker: &UploadTracker,
    notifier: &N,
) -> BatchReport
where
    T: Transport,
    N: Notifier + ?Sized,
{
    log::info!(
        "uploading {} file(s) to {} ({:?})",
        files.len(),
        config.endpoint,
        config.policy
    );

    let outcomes = match config.policy {
        SchedulePolicy::Sequential => {
            let mut outcomes = Vec::with_capacity(files.len());
            for (index, file) in files.iter().enumerate() {
                outcomes.push(run_job(index, file, transport, config, tracker, notifier).await);
            }
            outcomes
        }
        SchedulePolicy::Windowed(_) => {
            let window = config.policy.window();
            let mut outcomes = Vec::with_capacity(files.len());
            let mut in_flight = FuturesUnordered::new();

            for (index, file) in files.iter().enumerate() {
                if in_flight.len() >= window {
                    if let Some(outcome) = in_flight.next().await {
                        outcomes.push(outcome);
                    }
                }
                in_flight.push(run_job(index, file, transport, config, tracker, notifier));
            }

            while let Some(outcome) = in_flight.next().await {
                outcomes.push(outcome);
            }
            outcomes
        }
    };

    let report = BatchReport::from_outcomes(outcomes);
    log::info!(
        "batch finished: {} succeeded, {} failed",
        report.succeeded,
        report.failed
    );
    report
}

async fn run_job<T, N>(
    index: usize,
    file: &CandidateFile<T::Content>,
    transport: &T,
    config: &UploadConfig,
    tracker: &UploadTracker,
    notifier: &N,
) -> JobOutcome
where
    T: Transport,
    N: Notifier + ?Sized,
{
    tracker.start(index);
    log::debug!("job {} started: {} ({} bytes)", index, file.name, file.size);

    match transport.upload(file, tracker.progress_handle(index)).await {
        Ok(receipt) => {
            let preview_url = config.preview_url(&receipt.file_path);
            if !tracker.succeed(index, preview_url.clone()) {
                log::warn!("job {} succeeded but its tracker entry was not in flight", index);
            }
            log::debug!("job {} succeeded: {}", index, preview_url);
            JobOutcome {
                index,
                name: file.name.clone(),
                status: JobStatus::Succeeded,
                preview_url: Some(preview_url),
                error: None,
            }
        }
        Err(err) => {
            log::warn!("job {} ({}) failed: {}", index, file.name, err);
            notifier.notify(Notification::error(err.notification_text(&file.name)));
            if !tracker.fail(index) {
                log::warn!("job {} failed but its tracker entry was not in flight", index);
            }
            JobOutcome {
                index,
                name: file.name.clone(),
                status: JobStatus::Failed,
                preview_url: None,
                error: Some(err.to_string()),
            }
        }
    }
}
