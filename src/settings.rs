use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_to_file: bool,
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u32,
    /// X display name (e.g. ":1"); `None` uses $DISPLAY
    #[serde(default)]
    pub display: Option<String>,
}

fn default_log_level() -> String {
    config::logging::DEFAULT_LOG_LEVEL.to_string()
}

fn default_log_retention_days() -> u32 {
    config::logging::LOG_RETENTION_DAYS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_to_file: false,
            log_retention_days: default_log_retention_days(),
            display: None,
        }
    }
}

impl Settings {
    /// Apply CSDKIT_LOG_LEVEL / CSDKIT_DISPLAY on top of the file values
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(config::env::LOG_LEVEL_ENV).ok(),
            std::env::var(config::env::DISPLAY_ENV).ok(),
        );
    }

    pub fn apply_overrides(&mut self, log_level: Option<String>, display: Option<String>) {
        if let Some(level) = log_level.filter(|v| !v.trim().is_empty()) {
            self.log_level = level;
        }
        if let Some(display) = display.filter(|v| !v.trim().is_empty()) {
            self.display = Some(display);
        }
    }
}

pub fn csdkit_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(config::APP_DIR_NAME))
}

/// Load settings.json from `dir`, falling back to defaults when missing or invalid
pub fn load_settings_from_disk(dir: &Path) -> Settings {
    let path = dir.join(SETTINGS_FILE_NAME);
    let data = match fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Settings::default(),
        Err(e) => {
            tracing::warn!(file = ?path, error = %e, "Failed to read settings, using defaults");
            return Settings::default();
        }
    };

    match serde_json::from_str(&data) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(file = ?path, error = %e, "Invalid settings file, using defaults");
            Settings::default()
        }
    }
}

pub fn save_settings_to_disk(dir: &Path, settings: &Settings) -> anyhow::Result<()> {
    use anyhow::Context;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create settings directory: {:?}", dir))?;
    let path = dir.join(SETTINGS_FILE_NAME);
    let data = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    fs::write(&path, data).with_context(|| format!("Failed to write settings: {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"log_to_file": true}"#).unwrap();
        assert!(settings.log_to_file);
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.log_retention_days, 14);
        assert_eq!(settings.display, None);
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let mut settings = Settings::default();
        settings.apply_overrides(Some("  ".to_string()), Some(":2".to_string()));
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.display.as_deref(), Some(":2"));
    }
}
