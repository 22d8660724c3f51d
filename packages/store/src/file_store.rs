//! # Filesystem-backed note store
//!
//! [`FileStore`] is the [`NoteStore`] implementation used on **desktop**. Each
//! note is one file whose name is the raw key and whose contents are the note
//! text, so the layout mirrors the flat key/value shape of `localStorage`.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── notes/
//!     ├── 1581033600000      # raw note text
//!     └── 1581033601234
//! ```
//!
//! ## Platform data directories
//!
//! Use [`dirs::data_dir()`] to obtain a platform-appropriate base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/sticky-notes/` |
//! | Linux | `~/.local/share/sticky-notes/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\sticky-notes\` |
//!
//! ## Change notifications
//!
//! The desktop app runs a single window, so a `FileStore` is the only writer
//! of its directory and never receives change notifications. Separate
//! processes over the same directory do not notify each other either.
//!
//! [`dirs::data_dir()`]: https://docs.rs/dirs

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::config::StorageConfig;
use crate::error::StoreError;
use crate::models::NoteKey;
use crate::note_store::{ChangeHandler, NoteStore, Subscription};

pub struct FileStore {
    base: PathBuf,
    config: StorageConfig,
}

impl FileStore {
    pub fn new(base: PathBuf, config: StorageConfig) -> Self {
        Self { base, config }
    }

    fn notes_dir(&self) -> PathBuf {
        self.base.join("notes")
    }

    fn note_path(&self, raw: &str) -> PathBuf {
        self.notes_dir().join(raw)
    }
}

impl NoteStore for FileStore {
    fn put(&self, key: &NoteKey, message: &str) -> Result<(), StoreError> {
        let raw = self.config.encode(key);
        std::fs::create_dir_all(self.notes_dir())?;
        std::fs::write(self.note_path(&raw), message).map_err(|e| StoreError::Write {
            key: raw,
            reason: e.to_string(),
        })
    }

    fn remove(&self, key: &NoteKey) -> Result<(), StoreError> {
        let raw = self.config.encode(key);
        match std::fs::remove_file(self.note_path(&raw)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn get_all(&self) -> Result<Vec<(NoteKey, String)>, StoreError> {
        let entries = match std::fs::read_dir(self.notes_dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut notes = Vec::new();
        for entry in entries {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let Some(key) = self.config.decode(&name) else {
                tracing::debug!("Skipping non-note file {name:?}");
                continue;
            };
            let message = match std::fs::read_to_string(entry.path()) {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!("Skipping unreadable note file {name:?}: {e}");
                    continue;
                }
            };
            if message.is_empty() {
                tracing::debug!("Skipping empty note file {name:?}");
                continue;
            }
            notes.push((key, message));
        }
        Ok(notes)
    }

    /// No other context writes this directory, so the handler is never called.
    fn subscribe(&self, _handler: ChangeHandler) -> Result<Subscription, StoreError> {
        Ok(Subscription::new(|| {}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "sticky_notes_test_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = test_dir("roundtrip");
        let key = NoteKey::from_millis(1_581_033_600_000);

        let store = FileStore::new(dir.clone(), StorageConfig::default());
        assert!(store.get_all().unwrap().is_empty());
        store.put(&key, "Hello from FileStore!\nsecond line").unwrap();

        // Re-open from same directory
        let reopened = FileStore::new(dir.clone(), StorageConfig::default());
        assert_eq!(
            reopened.get_all().unwrap(),
            vec![(key, "Hello from FileStore!\nsecond line".to_string())]
        );
        assert!(dir.join("notes").join("1581033600000").exists());

        reopened.remove(&key).unwrap();
        assert!(store.get_all().unwrap().is_empty());
        // Removing again is fine
        reopened.remove(&key).unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_skips_foreign_and_empty_files() {
        let dir = test_dir("foreign");
        std::fs::create_dir_all(dir.join("notes")).unwrap();
        std::fs::write(dir.join("notes").join("README"), "not a note").unwrap();
        std::fs::write(dir.join("notes").join("12"), "").unwrap();

        let store = FileStore::new(dir.clone(), StorageConfig::default());
        store.put(&NoteKey::from_millis(13), "kept").unwrap();
        assert_eq!(
            store.get_all().unwrap(),
            vec![(NoteKey::from_millis(13), "kept".to_string())]
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_skips_unreadable_files() {
        let dir = test_dir("unreadable");
        std::fs::create_dir_all(dir.join("notes")).unwrap();
        std::fs::write(dir.join("notes").join("123"), [0xff, 0xfe, 0x00]).unwrap();

        let store = FileStore::new(dir.clone(), StorageConfig::default());
        store.put(&NoteKey::from_millis(456), "good note").unwrap();
        assert_eq!(
            store.get_all().unwrap(),
            vec![(NoteKey::from_millis(456), "good note".to_string())]
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_subscription_stays_silent() {
        use std::cell::Cell;
        use std::rc::Rc;

        let dir = test_dir("silent");
        let store = FileStore::new(dir.clone(), StorageConfig::default());
        let other = FileStore::new(dir.clone(), StorageConfig::default());
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let _subscription = store
            .subscribe(Box::new(move |_| seen.set(seen.get() + 1)))
            .unwrap();

        let key = NoteKey::from_millis(789);
        store.put(&key, "mine").unwrap();
        other.put(&key, "theirs").unwrap();
        other.remove(&key).unwrap();
        assert_eq!(calls.get(), 0);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
