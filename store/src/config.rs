//! Section-keyed configuration store trait.

use crate::StoreError;

/// A section-keyed string store, persisted as a whole on [`flush`].
///
/// One section exists per joined channel address. Mutations only touch the
/// in-memory view; `flush` rewrites the backing file in one go, so callers
/// must serialize read-modify-write cycles.
///
/// [`flush`]: ConfigStore::flush
pub trait ConfigStore: Send {
    fn has_section(&self, section: &str) -> bool;

    /// All section names, in a stable order.
    fn sections(&self) -> Vec<String>;

    fn get(&self, section: &str, key: &str) -> Option<String>;

    /// Every key/value pair of a section, empty when the section is absent.
    fn section_entries(&self, section: &str) -> Vec<(String, String)>;

    /// Set a value, creating the section if needed.
    fn set(&mut self, section: &str, key: &str, value: &str);

    /// Remove a section. Returns whether it existed.
    fn remove_section(&mut self, section: &str) -> bool;

    /// Persist the entire store.
    fn flush(&self) -> Result<(), StoreError>;
}

/// Parse a configuration boolean (`true/yes/on/1`, `false/no/off/0`).
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_config_spellings() {
        for v in ["true", "True", "YES", "on", "1", " true "] {
            assert_eq!(parse_bool(v), Some(true), "{v}");
        }
        for v in ["false", "No", "off", "0"] {
            assert_eq!(parse_bool(v), Some(false), "{v}");
        }
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }
}
