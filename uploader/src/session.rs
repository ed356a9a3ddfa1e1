//! Upload session: the current selection plus the batch state machine.
//!
//! ```text
//!   select() ──▶ selection replaced, rejects notified
//!   upload_all() ── idle ──▶ running ──▶ idle
//! ```
//!
//! A batch only starts from `idle` with a non-empty selection, and ends
//! once every job is terminal. The selection is frozen while running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::UploadConfig;
use crate::error::{BatchError, BatchResult, Rejection};
use crate::models::CandidateFile;
use crate::notify::{Notification, Notifier};
use crate::scheduler::{run_batch, BatchReport};
use crate::state::UploadTracker;
use crate::transport::Transport;
use crate::validation::validate_selection;

/// Title shown before anything was selected.
pub const IDLE_HEADLINE: &str = "File Uploader";

/// Shown when files are picked while a batch is uploading.
pub const SELECTION_LOCKED: &str = "Upload in progress, wait for it to finish before choosing new files.";

type Files<C> = Arc<Vec<CandidateFile<C>>>;

/// Owns the transport, the accepted files and the tracker for one widget.
pub struct UploadSession<T: Transport> {
    config: UploadConfig,
    transport: T,
    tracker: UploadTracker,
    selection: Mutex<Option<Files<T::Content>>>,
    running: AtomicBool,
}

/// Clears the running flag however the batch ends.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<T: Transport> UploadSession<T> {
    pub fn new(config: UploadConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            tracker: UploadTracker::new(),
            selection: Mutex::new(None),
            running: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn tracker(&self) -> &UploadTracker {
        &self.tracker
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Validate a new selection and make its accepted files current.
    ///
    /// Any previous selection is dropped. Each rejected file produces one
    /// error notification. Returns the rejections.
    ///
    /// Refused with [`BatchError::AlreadyRunning`] while a batch is in
    /// flight: job indices stay bound to the running selection until it ends.
    pub fn select<N>(
        &self,
        files: Vec<CandidateFile<T::Content>>,
        notifier: &N,
    ) -> BatchResult<Vec<Rejection>>
    where
        N: Notifier + ?Sized,
    {
        if self.is_running() {
            return Err(self.refuse_selection(notifier));
        }

        let selection = validate_selection(files, self.config.max_file_size);
        selection.notify_rejections(notifier);

        {
            // `upload_all` flips `running` under this lock.
            let mut current = self.lock_selection();
            if self.is_running() {
                drop(current);
                return Err(self.refuse_selection(notifier));
            }
            self.tracker
                .reset(selection.accepted.iter().map(|f| f.name.clone()));
            *current = Some(Arc::new(selection.accepted));
        }

        log::info!(
            "selected {} file(s), rejected {}",
            self.selected().unwrap_or(0),
            selection.rejected.len()
        );
        Ok(selection.rejected)
    }

    fn refuse_selection<N>(&self, notifier: &N) -> BatchError
    where
        N: Notifier + ?Sized,
    {
        log::warn!("selection ignored, a batch is running");
        notifier.notify(Notification::warning(SELECTION_LOCKED));
        BatchError::AlreadyRunning
    }

    /// Number of accepted files, `None` before the first selection.
    pub fn selected(&self) -> Option<usize> {
        self.lock_selection().as_ref().map(|files| files.len())
    }

    /// Names of the accepted files, in job order.
    pub fn selected_names(&self) -> Vec<String> {
        self.lock_selection()
            .as_ref()
            .map(|files| files.iter().map(|f| f.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Page title: progress once something is selected.
    pub fn headline(&self) -> String {
        match self.selected() {
            Some(total) => format!(
                "Uploading {} of {} Files",
                self.tracker.snapshot().succeeded,
                total
            ),
            None => IDLE_HEADLINE.to_string(),
        }
    }

    /// Upload the current selection.
    ///
    /// An empty selection notifies "No valid files selected." and makes no
    /// request. Starting while a batch runs is refused.
    pub async fn upload_all<N>(&self, notifier: &N) -> BatchResult<BatchReport>
    where
        N: Notifier + ?Sized,
    {
        let files = {
            let current = self.lock_selection();
            let files = current.as_ref().filter(|files| !files.is_empty()).cloned();
            // Claimed under the selection lock so `select` cannot slip in between.
            if files.is_some() && self.running.swap(true, Ordering::SeqCst) {
                return Err(BatchError::AlreadyRunning);
            }
            files
        };

        let Some(files) = files else {
            if self.is_running() {
                return Err(BatchError::AlreadyRunning);
            }
            notifier.notify(Notification::error(BatchError::EmptySelection.to_string()));
            return Err(BatchError::EmptySelection);
        };
        let _guard = RunningGuard(&self.running);

        self.tracker.reset(files.iter().map(|f| f.name.clone()));
        let report = run_batch(&files, &self.transport, &self.config, &self.tracker, notifier).await;
        Ok(report)
    }

    fn lock_selection(&self) -> std::sync::MutexGuard<'_, Option<Files<T::Content>>> {
        self.selection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
