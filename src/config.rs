//! Environment configuration.
//!
//! The proxy reads everything from the environment once at startup.  Only
//! `API_KEY` is mandatory; the rest fall back to defaults, which are logged.

use std::{env, fmt, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

pub struct ProxyConfig {
    pub port: u16,
    /// Upstream credential.  Never logged, never sent to clients.
    pub api_key: String,
    pub api_base: String,
    pub public_dir: PathBuf,
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("public_dir", &self.public_dir)
            .finish()
    }
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing("API_KEY"))?;

        Ok(Self {
            port: try_load(&lookup, "PORT", "3000")?,
            api_key,
            api_base: try_load(&lookup, "NASA_API_BASE", "https://api.nasa.gov")?,
            public_dir: try_load(&lookup, "PUBLIC_DIR", "public")?,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }
    })
}

/// Where the terminal dashboard writes its log.
pub fn dashboard_log_path() -> PathBuf {
    env::var_os("DASHBOARD_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("rover-dashboard.log"))
}
