//! Application configuration.
//!
//! The upload settings are baked in at build time from the same variables
//! the CLI reads at runtime:
//!
//! ```bash
//! PIXDROP_UPLOAD_URL=https://api.example.com/upload PIXDROP_API_KEY=... trunk build
//! ```

use pixdrop::config::{
    ENV_API_KEY, ENV_CONCURRENCY, ENV_MAX_FILE_SIZE, ENV_PREVIEW_BASE_URL, ENV_UPLOAD_URL,
};
use pixdrop::{ConfigResult, UploadConfig};

/// Upload endpoint.
pub const UPLOAD_URL: Option<&str> = option_env!("PIXDROP_UPLOAD_URL");

/// API key sent with every upload.
pub const API_KEY: Option<&str> = option_env!("PIXDROP_API_KEY");

/// Preview host override.
pub const PREVIEW_BASE_URL: Option<&str> = option_env!("PIXDROP_PREVIEW_BASE_URL");

/// Size limit override, in bytes.
pub const MAX_FILE_SIZE: Option<&str> = option_env!("PIXDROP_MAX_FILE_SIZE");

/// Concurrency window override.
pub const CONCURRENCY: Option<&str> = option_env!("PIXDROP_CONCURRENCY");

/// How long a toast stays on screen (ms).
pub const TOAST_TIMEOUT_MS: u32 = 5_000;

/// Maximum toasts visible at once; the oldest go first.
pub const MAX_TOASTS: usize = 6;

/// Accept attribute for the file input.
pub const ACCEPT: &str = "image/*";

fn build_time_value(key: &str) -> Option<&'static str> {
    match key {
        ENV_UPLOAD_URL => UPLOAD_URL,
        ENV_API_KEY => API_KEY,
        ENV_PREVIEW_BASE_URL => PREVIEW_BASE_URL,
        ENV_MAX_FILE_SIZE => MAX_FILE_SIZE,
        ENV_CONCURRENCY => CONCURRENCY,
        _ => None,
    }
}

/// Upload configuration from build-time values.
pub fn upload_config() -> ConfigResult<UploadConfig> {
    config_from(build_time_value)
}

fn config_from(values: impl Fn(&str) -> Option<&'static str>) -> ConfigResult<UploadConfig> {
    UploadConfig::from_lookup(|key| values(key).map(str::to_string))
}
