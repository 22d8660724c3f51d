//! # Widget configuration: `sticky-notes.toml`
//!
//! Optional TOML file read at startup on platforms that have a data directory.
//! Every section is defaulted, so a missing or empty file is equivalent to the
//! default configuration.
//!
//! ```toml
//! [storage]
//! key_prefix = ""          # prefix for note keys in the shared medium
//!
//! [notes]
//! date_format = "%b %-d"   # chrono strftime format for "Created on ..."
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`StickyNotesConfig`] | Top-level config with TOML (de)serialisation, validation and file loading. |
//! | [`StorageConfig`] | How note keys are laid out in the shared medium. Maps [`NoteKey`]s to raw keys and back. |
//! | [`NotesConfig`] | Presentation of rendered notes. |

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::{is_valid_date_format, NoteKey};

pub const DEFAULT_DATE_FORMAT: &str = "%b %-d";

/// Top-level configuration stored in `sticky-notes.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StickyNotesConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notes: NotesConfig,
}

/// Storage layout configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Prepended to every note key in the shared medium.
    /// Empty means keys are bare timestamps.
    #[serde(default)]
    pub key_prefix: String,
}

/// Presentation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotesConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
        }
    }
}

impl StorageConfig {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
        }
    }

    /// Raw key under which `key` is stored.
    pub fn encode(&self, key: &NoteKey) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    /// Note key for a raw medium key, or `None` for keys that belong to
    /// something else sharing the medium.
    pub fn decode(&self, raw: &str) -> Option<NoteKey> {
        raw.strip_prefix(self.key_prefix.as_str())?.parse().ok()
    }
}

impl StickyNotesConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "sticky-notes.toml"
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, StoreError> {
        let config: Self = toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load from `path`, returning the default configuration if the file does
    /// not exist.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        let prefix = &self.storage.key_prefix;
        let prefix_ok = prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'));
        if !prefix_ok || prefix.starts_with('.') {
            return Err(StoreError::Config(format!(
                "storage.key_prefix {prefix:?} may only contain ASCII letters, digits, '-', '_', ':' and '.', and must not start with '.'"
            )));
        }
        if !is_valid_date_format(&self.notes.date_format) {
            return Err(StoreError::Config(format!(
                "notes.date_format {:?} is not a valid strftime format",
                self.notes.date_format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = StickyNotesConfig::from_toml("").unwrap();
        assert_eq!(config, StickyNotesConfig::default());
        assert_eq!(config.storage.key_prefix, "");
        assert_eq!(config.notes.date_format, "%b %-d");
    }

    #[test]
    fn test_parse_sections() {
        let config = StickyNotesConfig::from_toml(
            "[storage]\nkey_prefix = \"sticky:\"\n\n[notes]\ndate_format = \"%Y-%m-%d\"\n",
        )
        .unwrap();
        assert_eq!(config.storage.key_prefix, "sticky:");
        assert_eq!(config.notes.date_format, "%Y-%m-%d");

        let reparsed = StickyNotesConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            StickyNotesConfig::from_toml("[storage]\nkey_prefix = \"a/b\"\n"),
            Err(StoreError::Config(_))
        ));
        assert!(matches!(
            StickyNotesConfig::from_toml("[notes]\ndate_format = \"%Q\"\n"),
            Err(StoreError::Config(_))
        ));
        assert!(matches!(
            StickyNotesConfig::from_toml("storage = 3"),
            Err(StoreError::Config(_))
        ));
    }

    #[test]
    fn test_key_codec() {
        let key = NoteKey::from_millis(42);
        let bare = StorageConfig::default();
        assert_eq!(bare.encode(&key), "42");
        assert_eq!(bare.decode("42"), Some(key));
        assert_eq!(bare.decode("theme"), None);

        let prefixed = StorageConfig::with_prefix("sticky:");
        assert_eq!(prefixed.encode(&key), "sticky:42");
        assert_eq!(prefixed.decode("sticky:42"), Some(key));
        assert_eq!(prefixed.decode("42"), None);
        assert_eq!(prefixed.decode("sticky:x"), None);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join(format!(
            "sticky_notes_missing_{}/sticky-notes.toml",
            std::process::id()
        ));
        assert_eq!(
            StickyNotesConfig::load(&path).unwrap(),
            StickyNotesConfig::default()
        );
    }
}
