//! Upload configuration.
//!
//! Read once at startup. The CLI takes it from the process environment
//! (after loading `.env`); the browser frontend bakes the same keys in at
//! compile time and goes through [`UploadConfig::from_lookup`].

use std::env;

use crate::error::{ConfigError, ConfigResult};
use crate::scheduler::SchedulePolicy;

/// Environment key for the upload endpoint URL.
pub const ENV_UPLOAD_URL: &str = "PIXDROP_UPLOAD_URL";

/// Environment key for the API key sent as `X-API-Key`.
pub const ENV_API_KEY: &str = "PIXDROP_API_KEY";

/// Environment key for the preview base URL.
pub const ENV_PREVIEW_BASE_URL: &str = "PIXDROP_PREVIEW_BASE_URL";

/// Environment key for the maximum accepted file size, in bytes.
pub const ENV_MAX_FILE_SIZE: &str = "PIXDROP_MAX_FILE_SIZE";

/// Environment key for the concurrency window.
pub const ENV_CONCURRENCY: &str = "PIXDROP_CONCURRENCY";

/// Public static-asset host that serves uploaded files.
pub const DEFAULT_PREVIEW_BASE_URL: &str = "https://static.ordbit.io/";

/// Maximum file size accepted for upload (11 MiB).
pub const MAX_FILE_SIZE: u64 = 11 * 1024 * 1024;

/// Maximum number of uploads in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 9;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Everything a batch needs to know about the endpoint and its limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    /// Upload endpoint (POST target)
    pub endpoint: String,
    /// Static API key
    pub api_key: String,
    /// Prefix joined with the server-returned file path
    pub preview_base_url: String,
    /// Largest accepted file, in bytes
    pub max_file_size: u64,
    /// How jobs are admitted
    pub policy: SchedulePolicy,
}

impl UploadConfig {
    /// Create a config with default limits and a window of [`DEFAULT_CONCURRENCY`].
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            preview_base_url: DEFAULT_PREVIEW_BASE_URL.to_string(),
            max_file_size: MAX_FILE_SIZE,
            policy: SchedulePolicy::Windowed(DEFAULT_CONCURRENCY),
        }
    }

    /// Read the configuration from process environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint = get(ENV_UPLOAD_URL).ok_or(ConfigError::Missing(ENV_UPLOAD_URL))?;
        let api_key = get(ENV_API_KEY).ok_or(ConfigError::Missing(ENV_API_KEY))?;

        let mut config = Self::new(endpoint, api_key);

        if let Some(base) = get(ENV_PREVIEW_BASE_URL) {
            config.preview_base_url = base;
        }
        if let Some(raw) = get(ENV_MAX_FILE_SIZE) {
            config.max_file_size = parse_number(ENV_MAX_FILE_SIZE, &raw)?;
        }
        if let Some(raw) = get(ENV_CONCURRENCY) {
            let window: usize = parse_number(ENV_CONCURRENCY, &raw)?;
            config.policy = SchedulePolicy::Windowed(window);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the preview base URL
    pub fn with_preview_base_url(mut self, base: impl Into<String>) -> Self {
        self.preview_base_url = base.into();
        self
    }

    /// Set the size limit
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Set the scheduling policy
    pub fn with_policy(mut self, policy: SchedulePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Check invariants that parsing alone cannot enforce.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        if self.policy == SchedulePolicy::Windowed(0) {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }

    /// Public URL for a server-assigned file path.
    pub fn preview_url(&self, file_path: &str) -> String {
        format!("{}{}", self.preview_base_url, file_path)
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: &str) -> ConfigResult<T> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: raw.to_string(),
    })
}
