use std::fs;
use std::io;
use std::path::Path;

use pixeloid_render::ViewportConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Errors ────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Settings ──────────────────────────────────────────────────────────

/// Editor settings file. Every field is optional on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub name: String,
    pub version: String,
    /// `env_logger` filter directives, e.g. `"info,pixeloid_render=debug"`.
    pub log_filter: String,
    pub viewport: ViewportConfig,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            version: "0.1.0".to_string(),
            log_filter: "info".to_string(),
            viewport: ViewportConfig::default(),
        }
    }
}

impl EditorSettings {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let settings = Self::from_json(&fs::read_to_string(path)?)?;
        log::info!("Loaded settings '{}' from {}", settings.name, path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::debug!("Saved settings '{}' to {}", self.name, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let settings = EditorSettings::from_json("{}").unwrap();
        assert_eq!(settings, EditorSettings::default());
    }

    #[test]
    fn test_nested_viewport_partial() {
        let settings = EditorSettings::from_json(
            r#"{ "name": "board", "viewport": { "max_zoom_level": 8, "initial_offset": [4, -2] } }"#,
        )
        .unwrap();
        assert_eq!(settings.name, "board");
        assert_eq!(settings.viewport.max_zoom_level, 8);
        assert_eq!(settings.viewport.viewport_width, 1400);
        assert_eq!(settings.viewport.initial_offset, [4.0, -2.0]);
    }

    #[test]
    fn test_bad_json_is_reported() {
        let err = EditorSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("pixeloid-settings-{}.json", std::process::id()));
        let mut settings = EditorSettings::new("scratch");
        settings.viewport.viewport_width = 640;
        settings.save(&path).unwrap();

        let loaded = EditorSettings::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EditorSettings::load("/nonexistent/pixeloid/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
