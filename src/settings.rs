use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::gdtf::DescriptorOptions;
use crate::storage::{read_json, write_json};

/// Generator settings, read from `gdtf-creator.json`. Every field is optional
/// in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub base_geometry: String,
    pub beam_geometry: String,
    pub unit_reference_prefix: String,
    /// Package into a `.gdtf` archive; otherwise write bare `description.xml`.
    pub write_archive: bool,
    /// Output directory used when none is given on the command line.
    pub output_dir: Option<PathBuf>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        let options = DescriptorOptions::default();
        Self {
            base_geometry: options.base_geometry,
            beam_geometry: options.beam_geometry,
            unit_reference_prefix: options.unit_reference_prefix,
            write_archive: true,
            output_dir: None,
        }
    }
}

impl GeneratorSettings {
    pub fn descriptor_options(&self, fixture_type_id: Option<Uuid>) -> DescriptorOptions {
        DescriptorOptions {
            fixture_type_id,
            base_geometry: self.base_geometry.clone(),
            beam_geometry: self.beam_geometry.clone(),
            unit_reference_prefix: self.unit_reference_prefix.clone(),
        }
    }
}

/// Load settings from `path`. A missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<GeneratorSettings, AppError> {
    if !path.exists() {
        return Ok(GeneratorSettings::default());
    }
    read_json(path).map_err(|e| AppError::SettingsError {
        message: format!("{}: {e}", path.display()),
    })
}

pub fn save_settings(path: &Path, settings: &GeneratorSettings) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_json(path, settings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip() {
        let dir = std::env::temp_dir().join("gdtf_creator_test_settings");
        let _ = std::fs::remove_dir_all(&dir);
        let path = crate::paths::settings_path(&dir);

        let settings = GeneratorSettings {
            beam_geometry: "Cell".to_string(),
            write_archive: false,
            output_dir: Some(PathBuf::from("/some/out")),
            ..GeneratorSettings::default()
        };
        save_settings(&path, &settings).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded, settings);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = std::env::temp_dir().join("gdtf_creator_test_partial_settings");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = crate::paths::settings_path(&dir);
        std::fs::write(&path, r#"{ "unit_reference_prefix": "Cell" }"#).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded.unit_reference_prefix, "Cell");
        assert_eq!(loaded.base_geometry, "Base");
        assert!(loaded.write_archive);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let dir = std::env::temp_dir().join("gdtf_creator_test_unknown_settings");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = crate::paths::settings_path(&dir);
        std::fs::write(&path, r#"{ "version": 1, "write_archive": false }"#).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert!(!loaded.write_archive);
        assert_eq!(loaded.beam_geometry, "Beam");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_returns_defaults() {
        let dir = std::env::temp_dir().join("gdtf_creator_test_no_settings");
        let _ = std::fs::remove_dir_all(&dir);
        let loaded = load_settings(&crate::paths::settings_path(&dir)).unwrap();
        assert_eq!(loaded, GeneratorSettings::default());
    }

    #[test]
    fn test_malformed_file_is_settings_error() {
        let dir = std::env::temp_dir().join("gdtf_creator_test_bad_settings");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = crate::paths::settings_path(&dir);
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(load_settings(&path), Err(AppError::SettingsError { .. })));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_descriptor_options_carry_names() {
        let settings = GeneratorSettings {
            base_geometry: "Body".to_string(),
            ..GeneratorSettings::default()
        };
        let id = Uuid::nil();
        let options = settings.descriptor_options(Some(id));
        assert_eq!(options.base_geometry, "Body");
        assert_eq!(options.fixture_type_id, Some(id));
    }
}
