//! Entry configuration
//!
//! One [`EntryConfig`] describes one media server the host talks to. It is
//! stored as JSON; every field but `host` has a default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use mcws_state::CoordinatorConfig;

use crate::browse::BrowsePath;
use crate::error::{Result, SdkError};

pub const DEFAULT_PORT: u16 = 52199;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 10;

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_scan_interval() -> u64 {
    DEFAULT_SCAN_INTERVAL_SECS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryConfig {
    pub host: String,

    /// Display name; falls back to the host
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub ssl: bool,

    /// Request timeout in seconds, applied by the client
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Give every zone player a device of its own instead of sharing one
    #[serde(default)]
    pub device_per_zone: bool,

    /// Zones to expose as players; empty means one player for the active zone
    #[serde(default)]
    pub zones: Vec<String>,

    #[serde(default)]
    pub browse_paths: Vec<BrowsePath>,

    /// Seconds between timer-driven refreshes
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u64,
}

impl EntryConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            name: None,
            port: DEFAULT_PORT,
            ssl: false,
            timeout: DEFAULT_TIMEOUT_SECS,
            username: None,
            password: None,
            device_per_zone: false,
            zones: Vec::new(),
            browse_paths: Vec::new(),
            scan_interval: DEFAULT_SCAN_INTERVAL_SECS,
        }
    }

    pub fn with_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zones = zones.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_browse_paths(mut self, paths: Vec<BrowsePath>) -> Self {
        self.browse_paths = paths;
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.host)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval)
    }

    /// Base URL of the MCWS endpoint
    pub fn base_url(&self) -> String {
        let scheme = if self.ssl { "https" } else { "http" };
        format!("{}://{}:{}/MCWS/v1/", scheme, self.host, self.port)
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig::new()
            .with_scan_interval(self.scan_interval())
            .with_zones(self.zones.iter().cloned())
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(SdkError::Config("host must not be empty".to_string()));
        }

        if self.port == 0 {
            return Err(SdkError::Config("port must be greater than 0".to_string()));
        }

        if self.timeout == 0 {
            return Err(SdkError::Config("timeout must be greater than 0".to_string()));
        }

        if self.username.is_some() != self.password.is_some() {
            return Err(SdkError::Config(
                "username and password must be given together".to_string(),
            ));
        }

        self.coordinator_config()
            .validate()
            .map_err(|err| SdkError::Config(err.to_string()))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EntryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// `<config dir>/jriver/entry.json`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(crate::DOMAIN).join("entry.json"))
    }
}
