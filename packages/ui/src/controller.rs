//! # NoteController: keeps rendered notes in step with the store
//!
//! The controller owns the injected [`NoteStore`], a [`NoteBoard`] that creates
//! views, and the map from [`NoteKey`] to the view currently showing that
//! note. After every call returns, the map holds exactly one view per note in
//! the store.
//!
//! ## Flow
//!
//! | Trigger | Call | Effect |
//! |---------|------|--------|
//! | Startup | [`initialize`](NoteController::initialize) | Render every stored note, subscribe to other windows. |
//! | Submit | [`save_note`](NoteController::save_note) | Write under a fresh key, render it. |
//! | Delete button | [`delete_note`](NoteController::delete_note) | Remove record and view. |
//! | Other window | [`apply_change`](NoteController::apply_change) | Create, update or remove a view. |
//!
//! Changes made elsewhere arrive through the [`ChangeStream`] returned by
//! `initialize`; whoever drives the UI loop feeds each item back into
//! `apply_change`. A context never receives its own writes on that stream.

use std::collections::HashMap;

use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use store::{KeyGenerator, NoteKey, NoteStore, StoreChange, StoreError, Subscription};
use thiserror::Error;

/// Changes made by other contexts, in delivery order.
pub type ChangeStream = UnboundedReceiver<StoreChange>;

/// A rendered note bound to one key.
pub trait NoteView {
    /// Replace the displayed message.
    fn update(&mut self, message: &str);

    /// Take the view off screen. Terminal.
    fn remove(self);
}

/// The container notes are rendered into.
pub trait NoteBoard {
    type View: NoteView;

    /// Create an empty view for `key`, placed directly after the section header.
    fn create(&mut self, key: NoteKey) -> Self::View;
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct NoteController<S: NoteStore, B: NoteBoard> {
    store: S,
    board: B,
    views: HashMap<NoteKey, B::View>,
    keys: KeyGenerator,
    available: bool,
    subscription: Option<Subscription>,
}

impl<S: NoteStore, B: NoteBoard> NoteController<S, B> {
    pub fn new(store: S, board: B) -> Self {
        Self {
            store,
            board,
            views: HashMap::new(),
            keys: KeyGenerator::new(),
            available: true,
            subscription: None,
        }
    }

    /// Render all stored notes and start listening to other contexts.
    ///
    /// Fails if the store cannot be read; the controller then refuses new
    /// notes until it is rebuilt.
    pub fn initialize(&mut self) -> Result<ChangeStream, ControllerError> {
        let notes = match self.store.get_all() {
            Ok(notes) => notes,
            Err(e) => {
                tracing::warn!("Note storage unavailable, disabling note creation: {e}");
                self.available = false;
                return Err(e.into());
            }
        };
        tracing::info!("Loaded {} notes", notes.len());
        for (key, message) in notes {
            self.display_note(key, &message);
        }

        let (tx, rx) = unbounded();
        let subscription = self.store.subscribe(Box::new(move |change| {
            if tx.unbounded_send(change).is_err() {
                tracing::debug!("Change stream closed, dropping notification");
            }
        }));
        match subscription {
            Ok(subscription) => self.subscription = Some(subscription),
            Err(e) => tracing::warn!("Changes from other windows will not be shown: {e}"),
        }
        Ok(rx)
    }

    /// Persist and render a new note.
    ///
    /// Blank input (empty or whitespace only) is ignored and returns
    /// `Ok(None)`. The message is stored as typed, without trimming.
    pub fn save_note(&mut self, message: &str) -> Result<Option<NoteKey>, ControllerError> {
        if message.trim().is_empty() {
            return Ok(None);
        }
        if !self.available {
            return Err(StoreError::Unavailable("note storage could not be read".into()).into());
        }

        let key = self.keys.next();
        if let Err(e) = self.store.put(&key, message) {
            tracing::error!("Failed to save note {key}: {e}");
            return Err(e.into());
        }
        self.display_note(key, message);
        tracing::info!("Saved note {key}");
        Ok(Some(key))
    }

    /// Create, update or delete the view for `key`. An empty message means
    /// the note is gone.
    pub fn display_note(&mut self, key: NoteKey, message: &str) {
        if message.is_empty() {
            if self.views.contains_key(&key) {
                if let Err(e) = self.delete_note(key) {
                    tracing::error!("Failed to delete note {key}: {e}");
                }
            }
            return;
        }

        let view = self
            .views
            .entry(key)
            .or_insert_with(|| self.board.create(key));
        view.update(message);
    }

    /// Remove the view and the record for `key`. Deleting an absent note is a
    /// no-op. The view is taken down even if the store refuses the removal.
    pub fn delete_note(&mut self, key: NoteKey) -> Result<(), ControllerError> {
        if let Some(view) = self.views.remove(&key) {
            view.remove();
        }
        self.store.remove(&key)?;
        tracing::info!("Deleted note {key}");
        Ok(())
    }

    /// Apply a change made by another context.
    pub fn apply_change(&mut self, change: StoreChange) {
        tracing::debug!("Applying change from another window: {change:?}");
        match change {
            StoreChange::Updated { key, new_value } => {
                self.display_note(key, new_value.as_deref().unwrap_or(""));
            }
            StoreChange::Cleared => {
                for (_, view) in self.views.drain() {
                    view.remove();
                }
            }
        }
    }

    /// Whether the submit control should be enabled for `input`.
    pub fn submit_enabled(&self, input: &str) -> bool {
        self.available && !input.trim().is_empty()
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Whether changes from other contexts are being received.
    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    /// Keys of the rendered notes, oldest first.
    pub fn keys(&self) -> Vec<NoteKey> {
        let mut keys: Vec<NoteKey> = self.views.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn board(&self) -> &B {
        &self.board
    }
}
