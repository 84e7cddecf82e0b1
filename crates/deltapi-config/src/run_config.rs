//! Run configuration

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default pause between two completed actions
pub const DEFAULT_DELAY_MS: u64 = 100;

/// Default interval at which a paused run re-checks its control state
pub const DEFAULT_PAUSE_POLL_MS: u64 = 1_000;

/// Default per-request timeout of the HTTP clients
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration of one differential run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Base URL of server A
    pub server_a: String,
    /// Base URL of server B
    pub server_b: String,
    /// Delay between completed actions, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Pause the run as soon as an action reports a failure
    #[serde(default)]
    pub pause_after_failure: bool,
    /// How often a paused run checks whether it was resumed or stopped
    #[serde(default = "default_pause_poll_ms")]
    pub pause_poll_ms: u64,
    /// Timeout applied to each HTTP request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

fn default_pause_poll_ms() -> u64 {
    DEFAULT_PAUSE_POLL_MS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl RunConfig {
    /// Create a configuration for two servers with default pacing
    pub fn new(server_a: impl Into<String>, server_b: impl Into<String>) -> Self {
        Self {
            server_a: server_a.into(),
            server_b: server_b.into(),
            delay_ms: DEFAULT_DELAY_MS,
            pause_after_failure: false,
            pause_poll_ms: DEFAULT_PAUSE_POLL_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_pause_after_failure(mut self, enabled: bool) -> Self {
        self.pause_after_failure = enabled;
        self
    }

    pub fn with_pause_poll_ms(mut self, pause_poll_ms: u64) -> Self {
        self.pause_poll_ms = pause_poll_ms;
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Load a configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("Loading run configuration: {:?}", path);

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseYaml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Override fields from `DELTAPI_*` environment variables
    pub fn apply_env(self) -> ConfigResult<Self> {
        self.apply_env_from(|var| std::env::var(var).ok())
    }

    /// Override fields from variables returned by `lookup`
    pub fn apply_env_from<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DELTAPI_SERVER_A") {
            self.server_a = url;
        }
        if let Some(url) = lookup("DELTAPI_SERVER_B") {
            self.server_b = url;
        }
        if let Some(value) = lookup("DELTAPI_DELAY_MS") {
            self.delay_ms = parse_env("DELTAPI_DELAY_MS", &value)?;
        }
        if let Some(value) = lookup("DELTAPI_PAUSE_AFTER_FAILURE") {
            self.pause_after_failure = parse_bool("DELTAPI_PAUSE_AFTER_FAILURE", &value)?;
        }
        if let Some(value) = lookup("DELTAPI_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("DELTAPI_REQUEST_TIMEOUT_SECS", &value)?;
        }
        Ok(self)
    }

    /// Check that both servers are usable base URLs and the pacing is sane
    pub fn validate(&self) -> ConfigResult<()> {
        validate_base_url("server_a", &self.server_a)?;
        validate_base_url("server_b", &self.server_b)?;

        if self.pause_poll_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "pause_poll_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn pause_poll_interval(&self) -> Duration {
        Duration::from_millis(self.pause_poll_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn validate_base_url(key: &str, url: &str) -> ConfigResult<()> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: "base URL is required".to_string(),
        });
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("'{}' is not an http(s) URL", url),
        });
    }
    Ok(())
}

fn parse_env(var: &str, value: &str) -> ConfigResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            value: value.to_string(),
        })
}

fn parse_bool(var: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            value: value.to_string(),
        }),
    }
}
