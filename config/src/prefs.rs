//! Small persisted key/value preferences (`prefs.toml`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

const PREFS_FILE: &str = "prefs.toml";

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("prefs path: {0}")]
    Path(String),
    #[error("read prefs: {0}")]
    Read(std::io::Error),
    #[error("parse prefs: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize prefs: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("write prefs: {0}")]
    Write(std::io::Error),
}

/// String preferences stored as a flat TOML table.
#[derive(Debug, Clone)]
pub struct PrefsStore {
    path: PathBuf,
}

impl PrefsStore {
    /// `$XDG_CONFIG_HOME/<app_name>/prefs.toml`.
    pub fn for_app(app_name: &str) -> Result<Self, PrefsError> {
        let dir = crate::app_config_dir(app_name).map_err(|e| PrefsError::Path(e.to_string()))?;
        Ok(Self::at(dir.join(PREFS_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PrefsError> {
        if !self.path.is_file() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(PrefsError::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Value for `key`, `None` when the file or key is missing.
    pub fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        Ok(self.read_all()?.remove(key))
    }

    /// Stores `key = value`, keeping other keys. Creates the parent directory when needed.
    pub fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        // An unreadable file is replaced rather than blocking the write.
        let mut all = self.read_all().unwrap_or_default();
        all.insert(key.to_string(), value.to_string());
        let body = toml::to_string(&all)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(PrefsError::Write)?;
        }
        std::fs::write(&self.path, body).map_err(PrefsError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::at(dir.path().join("prefs.toml"));
        assert_eq!(store.get("theme").unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips_and_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::at(dir.path().join("nested").join("prefs.toml"));
        store.set("theme", "light").unwrap();
        store.set("other", "x").unwrap();
        store.set("theme", "dark").unwrap();

        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn corrupt_file_is_a_parse_error_but_can_be_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "theme = [[[").unwrap();
        let store = PrefsStore::at(&path);

        assert!(matches!(store.get("theme"), Err(PrefsError::Parse(_))));
        store.set("theme", "light").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
    }
}
