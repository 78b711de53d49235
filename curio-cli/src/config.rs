//! Application configuration

use anyhow::{Context, Result};
use curio_eye::VisionConfig;
use curio_facts::FactsConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Aggregated configuration for the curio binary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub vision: VisionConfig,
    pub facts: FactsConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file; absent keys fall back to
    /// defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    /// Validate all sections
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.vision.validate()?;
        self.facts.validate()
    }
}
