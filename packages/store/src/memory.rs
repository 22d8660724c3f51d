use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::StorageConfig;
use crate::error::StoreError;
use crate::hub::{ChangeHub, ContextId, RawChange};
use crate::models::{NoteKey, StoreChange};
use crate::note_store::{ChangeHandler, NoteStore, Subscription};

/// A shared in-memory key-value medium, the stand-in for one origin's
/// `localStorage`. Open one [`MemoryStore`] per simulated window.
#[derive(Clone, Default)]
pub struct MemoryMedium {
    entries: Rc<RefCell<HashMap<String, String>>>,
    hub: ChangeHub,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a context with bare timestamp keys.
    pub fn open_context(&self) -> MemoryStore {
        self.open_context_with(StorageConfig::default())
    }

    pub fn open_context_with(&self, config: StorageConfig) -> MemoryStore {
        MemoryStore {
            medium: self.clone(),
            context: self.hub.register(),
            config,
        }
    }

    /// Write a raw entry without notifying anyone, as unrelated code sharing
    /// the medium would.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Number of raw entries, including ones that are not notes.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// In-memory [`NoteStore`] for tests and as a fallback when no persistent
/// medium exists.
///
/// Notifications from other contexts are queued and only delivered when
/// [`pump`](MemoryStore::pump) is called.
pub struct MemoryStore {
    medium: MemoryMedium,
    context: ContextId,
    config: StorageConfig,
}

impl MemoryStore {
    /// A standalone store on its own private medium.
    pub fn new() -> Self {
        MemoryMedium::new().open_context()
    }

    pub fn medium(&self) -> &MemoryMedium {
        &self.medium
    }

    /// Deliver queued notifications to this context's subscribers.
    pub fn pump(&self) -> usize {
        self.medium.hub.pump(self.context)
    }

    /// Notifications waiting for [`pump`](MemoryStore::pump).
    pub fn pending(&self) -> usize {
        self.medium.hub.pending(self.context)
    }

    /// Remove every entry in the medium, notes or not.
    pub fn clear(&self) {
        let was_empty = {
            let mut entries = self.medium.entries.borrow_mut();
            let was_empty = entries.is_empty();
            entries.clear();
            was_empty
        };
        if !was_empty {
            self.medium.hub.publish(
                self.context,
                RawChange {
                    key: None,
                    new_value: None,
                },
            );
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MemoryStore {
    fn drop(&mut self) {
        self.medium.hub.unregister(self.context);
    }
}

impl NoteStore for MemoryStore {
    fn put(&self, key: &NoteKey, message: &str) -> Result<(), StoreError> {
        let raw = self.config.encode(key);
        let previous = self
            .medium
            .entries
            .borrow_mut()
            .insert(raw.clone(), message.to_string());
        if previous.as_deref() != Some(message) {
            self.medium.hub.publish(
                self.context,
                RawChange {
                    key: Some(raw),
                    new_value: Some(message.to_string()),
                },
            );
        }
        Ok(())
    }

    fn remove(&self, key: &NoteKey) -> Result<(), StoreError> {
        let raw = self.config.encode(key);
        let removed = self.medium.entries.borrow_mut().remove(&raw);
        if removed.is_some() {
            self.medium.hub.publish(
                self.context,
                RawChange {
                    key: Some(raw),
                    new_value: None,
                },
            );
        }
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<(NoteKey, String)>, StoreError> {
        let entries = self.medium.entries.borrow();
        let mut notes = Vec::with_capacity(entries.len());
        for (raw, message) in entries.iter() {
            let Some(key) = self.config.decode(raw) else {
                tracing::debug!("Skipping non-note key {raw:?}");
                continue;
            };
            if message.is_empty() {
                tracing::debug!("Skipping empty note {raw:?}");
                continue;
            }
            notes.push((key, message.clone()));
        }
        Ok(notes)
    }

    fn subscribe(&self, mut handler: ChangeHandler) -> Result<Subscription, StoreError> {
        let config = self.config.clone();
        Ok(self.medium.hub.subscribe(
            self.context,
            Box::new(move |raw: RawChange| {
                if let Some(change) = decode_change(&config, raw) {
                    handler(change);
                }
            }),
        ))
    }
}

/// Translate a raw medium change into a note change, dropping foreign keys.
fn decode_change(config: &StorageConfig, raw: RawChange) -> Option<StoreChange> {
    let Some(raw_key) = raw.key else {
        return Some(StoreChange::Cleared);
    };
    let Some(key) = config.decode(&raw_key) else {
        tracing::debug!("Ignoring change to non-note key {raw_key:?}");
        return None;
    };
    Some(StoreChange::Updated {
        key,
        new_value: raw.new_value.filter(|v| !v.is_empty()),
    })
}
