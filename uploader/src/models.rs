//! Domain models: selected files and job status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// MIME type used when nothing better is known.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// A file picked by the user, before or after validation.
///
/// `C` is the file content: shared `Bytes` on the native side, a browser
/// `File` handle in the frontend. Names are not required to be unique.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFile<C> {
    /// File name as shown to the user
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Declared MIME type (may be empty)
    pub mime_type: String,
    /// Raw content
    pub content: C,
}

impl<C> CandidateFile<C> {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>, content: C) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            content,
        }
    }

    /// True when the declared type is `image/*`.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

impl<C: AsRef<[u8]>> CandidateFile<C> {
    /// Build a candidate from in-memory bytes; size is taken from the buffer.
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, content: C) -> Self {
        let size = content.as_ref().len() as u64;
        Self::new(name, size, mime_type, content)
    }
}

/// Lifecycle of one upload job.
///
/// `Pending → InFlight → {Succeeded | Failed}`. Terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    InFlight,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }

    /// Whether moving to `next` is a legal transition.
    pub fn can_become(&self, next: JobStatus) -> bool {
        match (self, next) {
            (JobStatus::Pending, JobStatus::InFlight) => true,
            (JobStatus::InFlight, JobStatus::Succeeded | JobStatus::Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::InFlight => write!(f, "in-flight"),
            JobStatus::Succeeded => write!(f, "succeeded"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Guess an image MIME type from a file extension.
///
/// Only image types are recognised; anything else falls back to
/// [`FALLBACK_MIME_TYPE`] and will be rejected by validation.
pub fn mime_from_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        _ => FALLBACK_MIME_TYPE,
    }
}

/// Human-readable size with binary units ("11.00 MiB").
pub fn format_size(size: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = size as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", size, UNITS[0])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}
