//! Browser services.
//!
//! # Services
//!
//! - [`upload`] - `XMLHttpRequest` transport with upload progress
//! - [`toast`] - notifier that turns upload messages into toasts

pub mod upload;
pub mod toast;

pub use upload::*;
pub use toast::*;
