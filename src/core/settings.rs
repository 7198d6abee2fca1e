use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunables for the simulated remote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSettings {
    pub submit_delay_ms: u64,
    pub success_rate: f64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            submit_delay_ms: 1000,
            success_rate: 0.7,
        }
    }
}

impl RemoteSettings {
    /// Rejects success rates the sampler cannot use.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.success_rate) {
            return Err(SettingsError::InvalidSuccessRate(self.success_rate));
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Success rate must be between 0.0 and 1.0, got {0}")]
    InvalidSuccessRate(f64),
}

/// Load settings from disk, returning defaults if the file is missing or invalid.
pub fn load_settings(path: &Path) -> RemoteSettings {
    if !path.exists() {
        return RemoteSettings::default();
    }

    match load_settings_from_file(path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(target: "todo", "Failed to load settings: {}, using defaults", e);
            RemoteSettings::default()
        }
    }
}

/// Load settings from a specific path, failing on read, parse, or validation errors.
pub fn load_settings_from_file(path: &Path) -> Result<RemoteSettings, SettingsError> {
    let contents = std::fs::read_to_string(path)?;
    let settings: RemoteSettings = serde_json::from_str(&contents)?;
    settings.validate()?;
    Ok(settings)
}

/// Save settings to disk, creating parent directories as needed.
pub fn save_settings(path: &Path, settings: &RemoteSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let contents = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, contents)?;
    Ok(())
}
