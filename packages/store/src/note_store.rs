//! # NoteStore: the persistence seam
//!
//! [`NoteStore`] is the synchronous key-value interface the controller talks
//! to. All backends share the same semantics:
//!
//! - `put`/`remove` mutate one record and notify every *other* context that
//!   shares the medium. The writing context is never notified of its own
//!   writes; it applies them itself.
//! - Writing a value equal to the stored one, or removing an absent key,
//!   notifies nobody.
//! - `get_all` returns notes in no particular order and skips keys that do not
//!   belong to the widget.
//!
//! Implementations live in sibling modules ([`crate::memory`],
//! [`crate::file_store`], and `local_storage` on the web).

use crate::error::StoreError;
use crate::models::{NoteKey, StoreChange};

/// Callback invoked once per remote mutation.
pub type ChangeHandler = Box<dyn FnMut(StoreChange)>;

/// Key-value persistence for note text.
pub trait NoteStore {
    fn put(&self, key: &NoteKey, message: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &NoteKey) -> Result<(), StoreError>;

    fn get_all(&self) -> Result<Vec<(NoteKey, String)>, StoreError>;

    /// Register `handler` for mutations made by other contexts. The handler
    /// stays registered until the returned [`Subscription`] is dropped.
    fn subscribe(&self, handler: ChangeHandler) -> Result<Subscription, StoreError>;
}

/// Guard returned by [`NoteStore::subscribe`]. Unregisters on drop.
#[must_use = "dropping a Subscription unregisters its handler"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
