// Dashboard configuration
// TOML file with environment overrides; every field has a default

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV with one row per day
    pub data_path: PathBuf,
    pub logo_url: String,
    pub header: String,
    pub subheader: String,
    /// Address for the web server
    pub bind_addr: String,
    pub histogram_bins: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/day.csv"),
            logo_url: "https://github.com/dicodingacademy/assets/raw/main/logo.png".to_string(),
            header: "Bike Sharing Dashboard".to_string(),
            subheader: "Rental Demographics".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            histogram_bins: 20,
        }
    }
}

impl DashboardConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: DashboardConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` if it exists, otherwise fall back to defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Config file from `BIKE_DASHBOARD_CONFIG` (or `dashboard.toml`), then
    /// `BIKE_DASHBOARD_DATA` / `BIKE_DASHBOARD_ADDR` overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os("BIKE_DASHBOARD_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = Self::load(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(data) = lookup("BIKE_DASHBOARD_DATA").filter(|v| !v.is_empty()) {
            self.data_path = PathBuf::from(data);
        }
        if let Some(addr) = lookup("BIKE_DASHBOARD_ADDR").filter(|v| !v.is_empty()) {
            self.bind_addr = addr;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.histogram_bins == 0 {
            return Err(ConfigError::InvalidBins);
        }
        Ok(())
    }
}
