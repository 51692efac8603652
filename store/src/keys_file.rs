//! TOML-backed configuration store.
//!
//! The whole document is one table per section:
//!
//! ```toml
//! ["BM-87Zd56bxno4k3mNjvQukRr5sQh7T9sqDrsd"]
//! vote = "true"
//! question = "Pick a color"
//! answers = '["Red","Green","Blue"]'
//! voters = '["BM-...","BM-...","BM-..."]'
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{ConfigStore, StoreError};

type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// A [`ConfigStore`] persisted to a single TOML file.
pub struct KeysFile {
    path: PathBuf,
    sections: Sections,
}

impl KeysFile {
    /// Open the file at `path`, starting empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let sections = match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str::<Sections>(&contents).map_err(|e| {
                StoreError::Serialization(format!("{}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Sections::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), sections = sections.len(), "opened keys file");
        Ok(Self { path, sections })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for KeysFile {
    fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    fn sections(&self) -> Vec<String> {
        self.sections.keys().cloned().collect()
    }

    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section)?.get(key).cloned()
    }

    fn section_entries(&self, section: &str) -> Vec<(String, String)> {
        self.sections
            .get(section)
            .map(|s| s.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    fn set(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_section(&mut self, section: &str) -> bool {
        self.sections.remove(section).is_some()
    }

    /// Rewrite the file: write a sibling temp file, then rename over the
    /// original so readers never observe a half-written store.
    fn flush(&self) -> Result<(), StoreError> {
        let contents = toml::to_string(&self.sections)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
