use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::draft;
use crate::error::CommitError;

const APP_NAME: &str = "exifcommit";
const CONFIG_FILE: &str = "config.json";

/// Environment variable holding extra search roots (platform path-list syntax).
pub const PATH_ENV: &str = "EXIFCOMMIT_PATH";
pub const EDITOR_ENV: &str = "EDITOR";

pub const DEFAULT_FIELD: &str = "ImageDescription";
pub const DEFAULT_EDITOR: &str = "vim";
pub const DEFAULT_EXIFTOOL: &str = "exiftool";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Metadata field edited by the run.
    pub field_name: String,
    /// Prefix of the file lines in the draft. Shared by rendering and parsing.
    pub marker: String,
    /// Editor program, optionally with arguments.
    pub editor_command: String,
    /// Keep the backend's backup of each original file.
    pub preserve_originals: bool,
    /// Search roots tried after the current directory.
    pub search_paths: Vec<PathBuf>,
    /// exiftool executable.
    pub exiftool: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            field_name: DEFAULT_FIELD.to_string(),
            marker: draft::DEFAULT_MARKER.to_string(),
            editor_command: DEFAULT_EDITOR.to_string(),
            preserve_originals: true,
            search_paths: Vec::new(),
            exiftool: DEFAULT_EXIFTOOL.to_string(),
        }
    }
}

impl Config {
    /// Load the user's config file and apply environment overrides.
    /// Falls back to defaults if the file is missing or unreadable.
    pub fn load() -> Self {
        let mut config = match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.apply_env(std::env::var_os(EDITOR_ENV), std::env::var_os(PATH_ENV));
        config
    }

    fn try_load() -> Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&config_path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// `EDITOR` replaces the editor command; `EXIFCOMMIT_PATH` entries are
    /// appended to the search roots.
    pub fn apply_env(
        &mut self,
        editor: Option<std::ffi::OsString>,
        paths: Option<std::ffi::OsString>,
    ) {
        if let Some(editor) = editor.and_then(|e| e.into_string().ok()) {
            if !editor.trim().is_empty() {
                self.editor_command = editor;
            }
        }
        if let Some(paths) = paths {
            self.search_paths.extend(
                std::env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()),
            );
        }
    }

    /// Search roots in lookup order: the current directory first.
    pub fn search_roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![PathBuf::from(".")];
        roots.extend(self.search_paths.iter().cloned());
        roots
    }

    pub fn validate(&self) -> Result<(), CommitError> {
        if self.field_name.trim().is_empty() {
            return Err(CommitError::Config("field name is empty".to_string()));
        }
        if self.marker.is_empty() {
            return Err(CommitError::Config("marker is empty".to_string()));
        }
        if self.marker.contains(['\n', '\r']) {
            return Err(CommitError::Config("marker contains a line break".to_string()));
        }
        if draft::header(&self.field_name).contains(&self.marker) {
            return Err(CommitError::Config(format!(
                "marker {:?} occurs in the draft header",
                self.marker
            )));
        }
        Ok(())
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.field_name, "ImageDescription");
        assert_eq!(config.marker, "# file: ");
        assert!(config.preserve_originals);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bare_marker_is_valid() {
        let config = Config {
            marker: "file: ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_marker_found_in_header() {
        let config = Config {
            marker: "#".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(CommitError::Config(_))));
    }

    #[test]
    fn rejects_empty_marker_and_field() {
        let config = Config {
            marker: String::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            field_name: " ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_overrides_editor_and_appends_paths() {
        let mut config = Config {
            search_paths: vec![PathBuf::from("/photos")],
            ..Config::default()
        };
        let joined = std::env::join_paths(["/a", "", "/b"]).unwrap();
        config.apply_env(Some(OsString::from("nano -w")), Some(joined));

        assert_eq!(config.editor_command, "nano -w");
        assert_eq!(
            config.search_roots(),
            vec![
                PathBuf::from("."),
                PathBuf::from("/photos"),
                PathBuf::from("/a"),
                PathBuf::from("/b"),
            ]
        );
    }

    #[test]
    fn blank_editor_env_is_ignored() {
        let mut config = Config::default();
        config.apply_env(Some(OsString::from("")), None);
        assert_eq!(config.editor_command, "vim");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "field_name": "XPComment", "preserve_originals": false }"#)
            .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.field_name, "XPComment");
        assert!(!config.preserve_originals);
        assert_eq!(config.marker, "# file: ");
        assert_eq!(config.editor_command, "vim");
    }
}
