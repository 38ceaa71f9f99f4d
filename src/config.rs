//! Configuration types for batch-api

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Batch dispatch behavior (concurrency, timeouts, status policy)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum number of requests in flight at once (default: 10)
    ///
    /// Requests beyond the limit wait for a free slot. A value of 0 is treated as 1.
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,

    /// Timeout for a single request, including reading the body (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// `Content-Type` header sent with every request body (default: "application/json")
    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// Report non-2xx responses as per-request failures (default: false)
    ///
    /// When false, any response the remote sends back is a success carrying its status
    /// code, and only transport problems count as failures.
    #[serde(default)]
    pub fail_on_error_status: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: default_concurrency_limit(),
            request_timeout: default_request_timeout(),
            content_type: default_content_type(),
            fail_on_error_status: false,
        }
    }
}

impl DispatchConfig {
    /// Concurrency limit clamped to at least one slot
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency_limit.max(1)
    }
}

/// Main configuration for [`Dispatcher`](crate::Dispatcher)
///
/// Works out of the box with `Config::default()`; every field has a default so
/// partial JSON documents deserialize.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dispatch settings
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl Config {
    /// Parse a configuration from a JSON document, filling in defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that would make every request fail
    pub fn validate(&self) -> Result<()> {
        if self.dispatch.request_timeout.is_zero() {
            return Err(Error::Config {
                message: "request_timeout must be greater than zero".to_string(),
                key: Some("request_timeout".to_string()),
            });
        }
        if self.dispatch.content_type.trim().is_empty() {
            return Err(Error::Config {
                message: "content_type must not be empty".to_string(),
                key: Some("content_type".to_string()),
            });
        }
        Ok(())
    }
}

fn default_concurrency_limit() -> usize {
    10
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_content_type() -> String {
    "application/json".to_string()
}

// Duration serialization helper (milliseconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
