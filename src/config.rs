//! Dashboard Configuration
//! Data locations and window settings, optionally overridden by `dashboard.json`.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional configuration file in the working directory.
pub const CONFIG_FILE: &str = "dashboard.json";

/// Settings for the dashboard window and its input files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding both CSV files, relative to the working directory
    pub data_dir: PathBuf,
    /// Ownership table file name
    pub cardata_file: String,
    /// City table file name
    pub city_file: String,
    /// Window title
    pub title: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            cardata_file: "fct_cardata.csv".to_string(),
            city_file: "dim_city.csv".to_string(),
            title: "Car Ownership & City Data Dashboard".to_string(),
            window_width: 1400.0,
            window_height: 900.0,
        }
    }
}

impl DashboardConfig {
    /// Load `dashboard.json` from the working directory, falling back to defaults.
    pub fn load() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    /// Parse a configuration file. Missing keys take their default value.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
    }

    pub fn cardata_path(&self) -> PathBuf {
        self.data_dir.join(&self.cardata_file)
    }

    pub fn city_path(&self) -> PathBuf {
        self.data_dir.join(&self.city_file)
    }
}
