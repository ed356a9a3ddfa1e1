//! # pixdrop - validate and batch-upload images
//!
//! pixdrop takes a selection of files, keeps the images that fit under the
//! size limit, and uploads each one to a configured endpoint with
//! per-file progress and a preview URL on success.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Selection  │────▶│  Validator  │────▶│  Scheduler  │────▶│  Transport  │
//! │ (raw files) │     │ (type/size) │     │ (window n)  │     │ (multipart) │
//! └─────────────┘     └─────────────┘     └──────┬──────┘     └──────┬──────┘
//!                                                │   progress / done │
//!                                                ▼                   │
//!                                         ┌─────────────┐            │
//!                                         │   Tracker   │◀───────────┘
//!                                         │ (snapshots) │
//!                                         └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pixdrop::{CandidateFile, HttpTransport, NotificationLog, UploadConfig, UploadSession};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = UploadConfig::from_env().unwrap();
//!     let session = UploadSession::new(config.clone(), HttpTransport::new(&config));
//!     let notes = NotificationLog::new();
//!
//!     let bytes = bytes::Bytes::from(std::fs::read("cat.png").unwrap());
//!     session.select(vec![CandidateFile::from_bytes("cat.png", "image/png", bytes)], &notes).unwrap();
//!     let report = session.upload_all(&notes).await.unwrap();
//!     println!("{} of {} uploaded", report.succeeded, report.total);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per concern
//! - [`models`] - Candidate files and job status
//! - [`config`] - Endpoint, API key, limits
//! - [`validation`] - Selection filtering
//! - [`notify`] - User-facing notifications
//! - [`state`] - Aggregate progress snapshots
//! - [`scheduler`] - Sequential and windowed job admission
//! - [`transport`] - Upload seam and the native HTTP transport
//! - [`session`] - Selection + batch lifecycle

// Core modules
pub mod error;
pub mod models;
pub mod config;

// Selection
pub mod validation;
pub mod notify;

// Uploading
pub mod state;
pub mod scheduler;
pub mod transport;
pub mod session;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    BatchError, BatchResult, ConfigError, ConfigResult, Rejection, UploadError, UploadResult,
};

// =============================================================================
// Re-exports - Models & Config
// =============================================================================

pub use models::{format_size, mime_from_extension, CandidateFile, JobStatus};

pub use config::{UploadConfig, DEFAULT_CONCURRENCY, DEFAULT_PREVIEW_BASE_URL, MAX_FILE_SIZE};

// =============================================================================
// Re-exports - Validation & Notifications
// =============================================================================

pub use validation::{check_file, validate_selection, Selection};

pub use notify::{Level, Notification, NotificationLog, Notifier};

// =============================================================================
// Re-exports - Scheduling
// =============================================================================

pub use state::{BatchSnapshot, JobProgress, ProgressHandle, UploadTracker};

pub use scheduler::{run_batch, BatchReport, JobOutcome, SchedulePolicy};

pub use transport::{parse_response, Transport, UploadReceipt};

#[cfg(feature = "native")]
pub use transport::http::HttpTransport;

pub use session::UploadSession;
