//! User-level settings, read from TOML.
//!
//! ```toml
//! field-preset = "romanized-original-english"
//! extra-field = "extra"
//!
//! [engine]
//! native-tag = "en"
//! downgrade-tag = "ja"
//! default-family-tag = "zh"
//! compensate-downgrade = true
//! ```
//!
//! Every key is optional.

use cne_names::EngineQuirks;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::preset::FieldPreset;

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("Failed to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings are not valid TOML or contain unknown values.
    #[error("Invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Settings {
    /// How field variants are combined into `cne-<field>`.
    pub field_preset: FieldPreset,
    /// The host field that stores the encoded metadata.
    pub extra_field: String,
    pub engine: EngineQuirks,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_preset: FieldPreset::default(),
            extra_field: "extra".to_string(),
            engine: EngineQuirks::default(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Settings, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Settings, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_full_settings() {
        let settings = Settings::from_toml_str(
            r#"
field-preset = "original-only"
extra-field = "annotation"

[engine]
downgrade-tag = "ko"
compensate-downgrade = false
"#,
        )
        .unwrap();

        assert_eq!(settings.field_preset, FieldPreset::OriginalOnly);
        assert_eq!(settings.extra_field, "annotation");
        assert_eq!(settings.engine.downgrade_tag, "ko");
        assert!(!settings.engine.compensate_downgrade);
        // Unset engine keys keep their defaults.
        assert_eq!(settings.engine.native_tag, "en");
    }

    #[test]
    fn test_unknown_preset_is_an_error() {
        let err = Settings::from_toml_str(r#"field-preset = "english-first""#).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        assert!(Settings::from_toml_str("extra_field = \"extra\"").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load(Path::new("/nonexistent/cne.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cne.toml"), "Got: {}", err);
    }
}
