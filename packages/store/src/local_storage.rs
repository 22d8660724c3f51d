//! # Browser `localStorage` note store
//!
//! [`LocalStorageStore`] is the [`NoteStore`] implementation used on the **web
//! platform**. Notes are stored in the origin's `window.localStorage`, keyed
//! by their (optionally prefixed) creation timestamp.
//!
//! ## Cross-window changes
//!
//! The browser fires a `storage` event on every *other* same-origin window
//! when `localStorage` changes. [`subscribe`](NoteStore::subscribe) installs a
//! listener for that event on `window`; events from `sessionStorage` and for
//! keys that are not notes are ignored, and a `null` key (another window
//! called `localStorage.clear()`) is reported as [`StoreChange::Cleared`].
//!
//! ## Availability
//!
//! `localStorage` can be missing or throw on access (privacy modes, sandboxed
//! iframes, disabled cookies). The store is still constructed, but every
//! operation returns [`StoreError::Unavailable`], which the controller turns
//! into a disabled note form rather than a crash.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Storage, StorageEvent};

use crate::config::StorageConfig;
use crate::error::StoreError;
use crate::models::{NoteKey, StoreChange};
use crate::note_store::{ChangeHandler, NoteStore, Subscription};

const STORAGE_EVENT: &str = "storage";

#[derive(Clone)]
pub struct LocalStorageStore {
    storage: Option<Storage>,
    config: StorageConfig,
}

impl LocalStorageStore {
    pub fn new(config: StorageConfig) -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("window.localStorage is not accessible");
        }
        Self { storage, config }
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("window.localStorage is not accessible".into()))
    }
}

impl NoteStore for LocalStorageStore {
    fn put(&self, key: &NoteKey, message: &str) -> Result<(), StoreError> {
        let raw = self.config.encode(key);
        self.storage()?
            .set_item(&raw, message)
            .map_err(|e| StoreError::Write {
                key: raw,
                reason: format!("{e:?}"),
            })
    }

    fn remove(&self, key: &NoteKey) -> Result<(), StoreError> {
        let raw = self.config.encode(key);
        self.storage()?
            .remove_item(&raw)
            .map_err(|e| StoreError::Write {
                key: raw,
                reason: format!("{e:?}"),
            })
    }

    fn get_all(&self) -> Result<Vec<(NoteKey, String)>, StoreError> {
        let storage = self.storage()?;
        let len = storage
            .length()
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;

        let mut notes = Vec::new();
        for index in 0..len {
            let Ok(Some(raw)) = storage.key(index) else {
                continue;
            };
            let Some(key) = self.config.decode(&raw) else {
                tracing::debug!("Skipping non-note key {raw:?}");
                continue;
            };
            match storage.get_item(&raw) {
                Ok(Some(message)) if !message.is_empty() => notes.push((key, message)),
                _ => {}
            }
        }
        Ok(notes)
    }

    fn subscribe(&self, mut handler: ChangeHandler) -> Result<Subscription, StoreError> {
        let storage = self.storage()?.clone();
        let window = web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window to listen on".into()))?;
        let config = self.config.clone();

        let listener = Closure::<dyn FnMut(StorageEvent)>::new(move |event: StorageEvent| {
            if event.storage_area().is_some_and(|area| area != storage) {
                return;
            }
            let Some(raw) = event.key() else {
                handler(StoreChange::Cleared);
                return;
            };
            let Some(key) = config.decode(&raw) else {
                tracing::debug!("Ignoring storage event for non-note key {raw:?}");
                return;
            };
            handler(StoreChange::Updated {
                key,
                new_value: event.new_value().filter(|v| !v.is_empty()),
            });
        });

        window
            .add_event_listener_with_callback(STORAGE_EVENT, listener.as_ref().unchecked_ref())
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;

        Ok(Subscription::new(move || {
            let _ = window.remove_event_listener_with_callback(
                STORAGE_EVENT,
                listener.as_ref().unchecked_ref(),
            );
        }))
    }
}
