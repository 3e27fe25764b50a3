use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Run configuration for the CLI, read from a YAML file when present.
/// Every field has a default so running without a file just works.
#[derive(Debug, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_data_path")]
    pub data_path: String,
    #[serde(default = "default_heatmap_metric")]
    pub heatmap_metric: String,
    #[serde(default = "default_export_path")]
    pub export_path: String,
}

fn default_data_path() -> String {
    "data/tanks.json".to_string()
}

fn default_heatmap_metric() -> String {
    "health_score".to_string()
}

fn default_export_path() -> String {
    "tank_status.csv".to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            heatmap_metric: default_heatmap_metric(),
            export_path: default_export_path(),
        }
    }
}

impl RunConfig {
    /// Loads the configuration, falling back to defaults when the file does
    /// not exist.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{path}'"))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from '{path}'"))?;
        Ok(config)
    }
}
