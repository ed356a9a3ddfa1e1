//! Aggregate upload state.
//!
//! Every job writes into one shared [`BatchSnapshot`]. Updates are applied
//! copy-then-replace: the current snapshot is cloned, the clone is changed
//! at a single index, and the new `Arc` is swapped in while the lock is
//! held. Readers always see a complete snapshot and two jobs finishing in
//! the same tick never overwrite each other.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::JobStatus;

/// Progress and outcome of one job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobProgress {
    /// File name, for display
    pub name: String,
    /// Percent transferred, in [0, 100], never decreasing
    pub progress: f64,
    pub status: JobStatus,
    /// Set once the job succeeded
    pub preview_url: Option<String>,
}

impl JobProgress {
    fn pending(name: String) -> Self {
        Self {
            name,
            progress: 0.0,
            status: JobStatus::Pending,
            preview_url: None,
        }
    }

    /// Progress rounded for display
    pub fn percent(&self) -> u8 {
        self.progress.round().clamp(0.0, 100.0) as u8
    }
}

/// Immutable view of a batch at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSnapshot {
    pub total: usize,
    pub succeeded: usize,
    /// Indexed by job index
    pub jobs: Vec<JobProgress>,
}

impl BatchSnapshot {
    pub fn job(&self, index: usize) -> Option<&JobProgress> {
        self.jobs.get(index)
    }

    pub fn count(&self, status: JobStatus) -> usize {
        self.jobs.iter().filter(|j| j.status == status).count()
    }

    pub fn in_flight(&self) -> usize {
        self.count(JobStatus::InFlight)
    }

    pub fn failed(&self) -> usize {
        self.count(JobStatus::Failed)
    }

    /// True once every job reached a terminal state.
    pub fn is_finished(&self) -> bool {
        self.jobs.iter().all(|j| j.status.is_terminal())
    }

    pub fn headline(&self) -> String {
        format!("Uploading {} of {} Files", self.succeeded, self.total)
    }
}

/// Called with every new snapshot.
pub type Listener = Arc<dyn Fn(&BatchSnapshot) + Send + Sync>;

#[derive(Default)]
struct TrackerInner {
    snapshot: Mutex<Arc<BatchSnapshot>>,
    listeners: Mutex<Vec<Listener>>,
}

/// Shared handle to the aggregate state of the current batch.
///
/// Cheap to clone; all clones see the same state.
#[derive(Clone, Default)]
pub struct UploadTracker {
    inner: Arc<TrackerInner>,
}

impl std::fmt::Debug for UploadTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadTracker")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A listener panicking mid-update leaves the previous snapshot in place.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for snapshot changes.
    pub fn subscribe(&self, listener: impl Fn(&BatchSnapshot) + Send + Sync + 'static) {
        lock(&self.inner.listeners).push(Arc::new(listener));
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<BatchSnapshot> {
        Arc::clone(&lock(&self.inner.snapshot))
    }

    /// Start a new batch: one pending job per name, everything at zero.
    pub fn reset<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let jobs: Vec<JobProgress> = names
            .into_iter()
            .map(|n| JobProgress::pending(n.into()))
            .collect();
        let next = BatchSnapshot {
            total: jobs.len(),
            succeeded: 0,
            jobs,
        };
        self.replace(next);
    }

    /// `Pending → InFlight`.
    pub fn start(&self, index: usize) -> bool {
        self.update(index, |_, job| {
            if !job.status.can_become(JobStatus::InFlight) {
                return false;
            }
            job.status = JobStatus::InFlight;
            true
        })
    }

    /// Record a byte-level progress event.
    ///
    /// Ignored when `total` is zero (length not computable), when the job is
    /// not in flight, or when it would move progress backwards.
    pub fn record_progress(&self, index: usize, loaded: u64, total: u64) -> bool {
        if total == 0 {
            return false;
        }
        let percent = (loaded as f64 * 100.0 / total as f64).clamp(0.0, 100.0);
        self.update(index, |_, job| {
            if job.status != JobStatus::InFlight || percent <= job.progress {
                return false;
            }
            job.progress = percent;
            true
        })
    }

    /// `InFlight → Succeeded`: progress to exactly 100, preview stored, counter bumped.
    pub fn succeed(&self, index: usize, preview_url: String) -> bool {
        self.update(index, |batch, job| {
            if !job.status.can_become(JobStatus::Succeeded) {
                return false;
            }
            job.status = JobStatus::Succeeded;
            job.progress = 100.0;
            job.preview_url = Some(preview_url);
            batch.succeeded += 1;
            true
        })
    }

    /// `InFlight → Failed`. Progress stays at its last reported value.
    pub fn fail(&self, index: usize) -> bool {
        self.update(index, |_, job| {
            if !job.status.can_become(JobStatus::Failed) {
                return false;
            }
            job.status = JobStatus::Failed;
            true
        })
    }

    /// Progress reporter bound to one job index.
    pub fn progress_handle(&self, index: usize) -> ProgressHandle {
        ProgressHandle {
            index,
            tracker: self.clone(),
        }
    }

    fn update<F>(&self, index: usize, change: F) -> bool
    where
        F: FnOnce(&mut BatchCounters, &mut JobProgress) -> bool,
    {
        let next = {
            let mut current = lock(&self.inner.snapshot);
            let mut copy = BatchSnapshot::clone(&current);
            let Some(job) = copy.jobs.get_mut(index) else {
                log::warn!("progress update for unknown job {}", index);
                return false;
            };
            let mut counters = BatchCounters {
                succeeded: copy.succeeded,
            };
            if !change(&mut counters, job) {
                return false;
            }
            copy.succeeded = counters.succeeded;
            let next = Arc::new(copy);
            *current = Arc::clone(&next);
            next
        };
        self.publish(&next);
        true
    }

    fn replace(&self, snapshot: BatchSnapshot) {
        let next = Arc::new(snapshot);
        *lock(&self.inner.snapshot) = Arc::clone(&next);
        self.publish(&next);
    }

    fn publish(&self, snapshot: &BatchSnapshot) {
        let listeners = lock(&self.inner.listeners).clone();
        for listener in listeners {
            listener(snapshot);
        }
    }
}

/// Batch-level fields a job update may touch.
struct BatchCounters {
    succeeded: usize,
}

/// Reports byte progress for a single job.
///
/// Handed to a [`Transport`](crate::transport::Transport); it can only ever
/// write to its own index.
#[derive(Clone, Debug)]
pub struct ProgressHandle {
    index: usize,
    tracker: UploadTracker,
}

impl ProgressHandle {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn report(&self, loaded: u64, total: u64) {
        self.tracker.record_progress(self.index, loaded, total);
    }
}
