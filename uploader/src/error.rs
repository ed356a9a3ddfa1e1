//! Error types for the pixdrop upload pipeline.
//!
//! One enum per concern:
//!
//! - [`Rejection`] - a selected file failed validation
//! - [`UploadError`] - a single upload job failed
//! - [`BatchError`] - a batch could not be started
//! - [`ConfigError`] - invalid or missing configuration
//!
//! Rejections and upload errors are recovered locally: the file is excluded
//! or the job is marked failed, and the user is told through a
//! [`Notification`](crate::notify::Notification).

use thiserror::Error;

use crate::models::format_size;

// =============================================================================
// Validation Rejections
// =============================================================================

/// Why a selected file was excluded from the upload list.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// File is larger than the configured limit.
    #[error("{name} exceeds the {} limit and won't be uploaded.", format_size(*.limit))]
    Oversize { name: String, size: u64, limit: u64 },

    /// Declared MIME type is not `image/*`.
    #[error("{name} is not a valid image file and won't be uploaded.")]
    NotAnImage { name: String, mime_type: String },
}

impl Rejection {
    /// Name of the rejected file.
    pub fn file_name(&self) -> &str {
        match self {
            Rejection::Oversize { name, .. } | Rejection::NotAnImage { name, .. } => name,
        }
    }
}

// =============================================================================
// Upload Errors
// =============================================================================

/// A single upload job failed.
///
/// None of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The request never produced a response (connection refused, DNS, reset).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("Upload failed with status: {0}")]
    Status(u16),

    /// Success status but the body was not the expected JSON.
    #[error("Invalid upload response: {0}")]
    InvalidResponse(String),

    /// The multipart payload could not be built.
    #[error("Failed to build upload form: {0}")]
    Form(String),
}

impl UploadError {
    /// User-facing message for a failed job.
    ///
    /// Transport-level failures and server-side refusals read differently so
    /// the user can tell a dead network from a rejected file.
    pub fn notification_text(&self, file_name: &str) -> String {
        match self {
            UploadError::Transport(_) | UploadError::Form(_) => {
                format!("Error uploading {}", file_name)
            }
            UploadError::Status(_) | UploadError::InvalidResponse(_) => {
                format!("Failed to upload {}", file_name)
            }
        }
    }
}

// =============================================================================
// Batch Errors
// =============================================================================

/// A batch could not be started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// Nothing was left after validation.
    #[error("No valid files selected.")]
    EmptySelection,

    /// A batch is already in flight.
    #[error("An upload is already in progress.")]
    AlreadyRunning,
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration errors, raised once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Required setting absent.
    #[error("Missing {0} environment variable")]
    Missing(&'static str),

    /// Numeric setting could not be parsed.
    #[error("Invalid value for {var}: {value:?} is not a number")]
    InvalidNumber { var: &'static str, value: String },

    /// A concurrency window of zero would never admit a job.
    #[error("Concurrency window must be at least 1")]
    ZeroWindow,

    /// Endpoint is not an http(s) URL.
    #[error("Upload endpoint must be an http(s) URL, got {0:?}")]
    InvalidEndpoint(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for upload jobs.
pub type UploadResult<T> = Result<T, UploadError>;

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;
