//! Coordinator configuration

use std::time::Duration;

use crate::error::{Result, StateError};

/// Configuration for the [`Coordinator`](crate::Coordinator)
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Interval between timer-driven refresh cycles
    /// Default: 10 seconds
    pub scan_interval: Duration,

    /// Zones whose playback is polled each cycle
    /// Default: empty, meaning only the server's active zone
    pub zones: Vec<String>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_secs(10),
            zones: Vec::new(),
        }
    }
}

impl CoordinatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval = interval;
        self
    }

    pub fn with_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zones = zones.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan_interval == Duration::ZERO {
            return Err(StateError::Config(
                "Scan interval must be greater than 0".to_string(),
            ));
        }

        if self.zones.iter().any(|z| z.trim().is_empty()) {
            return Err(StateError::Config("Zone names must not be empty".to_string()));
        }

        Ok(())
    }
}
