//! Application settings.
//!
//! Precedence, lowest first: built-in defaults, `dashboard.toml` in the
//! working directory (optional), then `GOLDRISK_*` environment variables with
//! `__` separating nested keys (e.g. `GOLDRISK_WINDOW__WIDTH=1600`).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATA_PATH: &str = "Gold-Silver-GeopoliticalRisk_HistoricalData.csv";
const SETTINGS_FILE: &str = "dashboard";
const ENV_PREFIX: &str = "GOLDRISK";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// CSV opened at startup.
    pub data_path: PathBuf,
    /// Rows shown in the filtered-data preview.
    pub preview_rows: usize,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub window: WindowSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            preview_rows: 5,
            log_filter: "info".to_string(),
            window: WindowSettings::default(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 850.0,
        }
    }
}

impl Settings {
    /// Load from `dashboard.toml` (if present) and the environment.
    pub fn load() -> Result<Self, SettingsError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(SETTINGS_FILE).required(false));
        Self::finish(builder)
    }

    /// Load from a specific file (format picked from its extension) and the environment.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let builder = config::Config::builder().add_source(config::File::from(path));
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, SettingsError> {
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.preview_rows == 0 {
            return Err(SettingsError::Invalid(
                "preview_rows must be at least 1".to_string(),
            ));
        }
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "window size must be positive, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_point_at_bundled_dataset() {
        let settings = Settings::default();
        assert_eq!(settings.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(settings.preview_rows, 5);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn file_overrides_only_given_keys() {
        let file = toml_file(
            r#"
data_path = "data/prices.csv"

[window]
width = 1600.0
"#,
        );
        let settings = Settings::load_from(file.path()).unwrap();

        assert_eq!(settings.data_path, PathBuf::from("data/prices.csv"));
        assert_eq!(settings.window.width, 1600.0);
        assert_eq!(settings.window.height, 850.0);
        assert_eq!(settings.preview_rows, 5);
    }

    #[test]
    fn rejects_zero_preview_rows() {
        let file = toml_file("preview_rows = 0\n");
        let err = Settings::load_from(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }
}
