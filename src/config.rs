//! Connection settings for the dashboard backend.
//!
//! Values come from the environment (a `.env` file is loaded first by the
//! binary) and may be overridden by CLI flags:
//!
//! | Variable           | Default     |
//! |--------------------|-------------|
//! | `API_HOST`         | `localhost` |
//! | `API_PORT`         | `7001`      |
//! | `API_TIMEOUT_SECS` | `30`        |

use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_API_HOST: &str = "localhost";
pub const DEFAULT_API_PORT: u16 = 7001;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub api_host: String,
    pub api_port: u16,
    pub request_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            api_port: DEFAULT_API_PORT,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DashboardConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = lookup("API_HOST").filter(|h| !h.trim().is_empty()) {
            config.api_host = host.trim().to_string();
        }
        if let Some(port) = lookup("API_PORT") {
            config.api_port = port
                .trim()
                .parse()
                .with_context(|| format!("API_PORT is not a valid port: '{port}'"))?;
        }
        if let Some(secs) = lookup("API_TIMEOUT_SECS") {
            config.request_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("API_TIMEOUT_SECS is not a number: '{secs}'"))?;
        }

        Ok(config)
    }

    /// Root of the REST API, e.g. `http://localhost:7001/api`.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/api", self.api_host, self.api_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
