use std::{fs, path::Path, path::PathBuf};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{NotesError, Result, DEFAULT_FOLDER_ICON};

/// File name of the data file inside the data directory.
pub const DATA_FILE_NAME: &str = "notes.json";

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// JSON file holding all notes and folders
    pub data_file: PathBuf,

    /// Icon for folders created without one
    pub default_folder_icon: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = ProjectDirs::from("", "", "folio")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            data_file: data_dir.join(DATA_FILE_NAME),
            default_folder_icon: DEFAULT_FOLDER_ICON.to_string(),
        }
    }
}

impl Config {
    /// Reads a JSON config file. Keys it leaves out keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Reading configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| NotesError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|e| NotesError::ConfigError {
            message: format!("invalid config {}: {}", path.display(), e),
        })?;

        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    /// Builds the effective configuration: defaults, then the config file if
    /// given, then the explicit data file override.
    pub fn resolve(config_file: Option<&Path>, data_file: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(data_file) = data_file {
            config.data_file = data_file;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_points_at_notes_json() {
        let config = Config::default();
        assert!(config.data_file.ends_with(DATA_FILE_NAME));
        assert_eq!(config.default_folder_icon, DEFAULT_FOLDER_ICON);
    }

    #[test]
    fn file_overrides_only_given_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "default_folder_icon": "🗂️" }"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.default_folder_icon, "🗂️");
        assert_eq!(config.data_file, Config::default().data_file);
    }

    #[test]
    fn data_file_flag_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "data_file": "/tmp/a.json" }"#).unwrap();

        let config = Config::resolve(Some(&path), Some(PathBuf::from("/tmp/b.json"))).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/tmp/b.json"));
    }

    #[test]
    fn bad_config_is_a_config_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            Config::from_file(&missing),
            Err(NotesError::ConfigError { .. })
        ));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "[").unwrap();
        assert!(matches!(
            Config::from_file(&bad),
            Err(NotesError::ConfigError { .. })
        ));
    }
}
