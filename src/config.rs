use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::db;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Location of the provider database file.
    #[serde(default = "crate::db::default_db_path")]
    pub db_path: PathBuf,

    /// Authority segment of all resource identifiers served by this
    /// provider instance.
    #[serde(default = "default_authority")]
    pub authority: String,
}

fn default_authority() -> String {
    "gallery".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: db::default_db_path(),
            authority: default_authority(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.authority, "gallery");
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery-provider.toml");

        let mut config = Config::default();
        config.authority = "photos.internal".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.authority, "photos.internal");
        assert_eq!(loaded.db_path, config.db_path);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery-provider.toml");
        std::fs::write(&path, "authority = \"custom\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.authority, "custom");
        assert!(config.db_path.ends_with("gallery_source.db"));
    }
}
