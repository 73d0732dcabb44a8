//! Client configuration.
//!
//! [`ClientConfig`] is the serializable form of the client's tunables. It can
//! be embedded in a host application's own config file, or loaded on its own
//! from TOML (feature `config`):
//!
//! ```toml
//! timeout_secs = 10
//! debug = true
//!
//! [retry]
//! count = 5
//! initial_delay_ms = 200
//! ```
//!
//! Omitted keys fall back to the same defaults the builder uses.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::providers::retry::RetryConfig;

/// Serializable client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Per-call deadline in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub retry: RetrySettings,
    /// Emit debug events for every request (default: false).
    #[serde(default)]
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retry: RetrySettings::default(),
            debug: false,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Retry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Attempts per provider, including the first (default: 3).
    #[serde(default = "default_retry_count")]
    pub count: u32,
    /// Delay before the first retry in milliseconds (default: 500).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Cap on the backoff delay in milliseconds (default: 30000).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            count: default_retry_count(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_retry_count() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

impl ClientConfig {
    /// Per-call deadline.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry configuration for the client.
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .max_attempts(self.retry.count)
            .initial_delay(Duration::from_millis(self.retry.initial_delay_ms))
            .max_delay(Duration::from_millis(self.retry.max_delay_ms))
    }
}

#[cfg(feature = "config")]
mod load {
    use std::fs;
    use std::path::Path;

    use super::ClientConfig;
    use crate::{BifrostError, Result};

    impl ClientConfig {
        /// Parse a TOML document.
        pub fn from_toml_str(content: &str) -> Result<Self> {
            toml::from_str(content)
                .map_err(|e| BifrostError::Configuration(format!("invalid config: {e}")))
        }

        /// Load a TOML file.
        pub fn load(path: impl AsRef<Path>) -> Result<Self> {
            let path = path.as_ref();
            let content = fs::read_to_string(path).map_err(|e| {
                BifrostError::Configuration(format!("failed to read {}: {e}", path.display()))
            })?;
            Self::from_toml_str(&content)
        }
    }
}
