//! Configuration types for the Paperless-ngx sensor service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_entries_path")]
    pub entries_path: PathBuf,
    #[serde(default = "default_scan_interval", with = "humantime_serde")]
    pub scan_interval: Duration,
    /// Sensors declared directly in the config file instead of through the wizard
    #[serde(default)]
    pub sensor: Vec<PlatformConfig>,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entries_path: default_entries_path(),
            scan_interval: default_scan_interval(),
            sensor: Vec::new(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Config {
    /// Reject settings the scheduler cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.scan_interval.is_zero() {
            return Err(crate::PaperlessError::Config(
                "scan_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Legacy platform block; both fields are optional so a missing one can be reported
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dashboard_port(),
        }
    }
}

fn default_entries_path() -> PathBuf {
    PathBuf::from("paperless_entries.json")
}

fn default_scan_interval() -> Duration {
    crate::sensor::SCAN_INTERVAL
}

fn default_true() -> bool {
    true
}

fn default_dashboard_port() -> u16 {
    11130
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::PaperlessError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
