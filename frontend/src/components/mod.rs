//! UI Components for the pixdrop widget.
//!
//! # Layout Components
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`UploadSection`] - Image picker, headline and upload button
//! - [`FileList`] - Per-file progress and previews
//! - [`ToastStack`] - Transient notifications

mod hero;
mod upload;
mod file_list;
mod toasts;
mod footer;

pub use hero::*;
pub use upload::*;
pub use file_list::*;
pub use toasts::*;
pub use footer::*;
