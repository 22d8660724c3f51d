//! [`NoteBoard`] backed by a Dioxus signal.
//!
//! The board keeps the rendered notes as an ordered `Vec` inside a
//! `Signal`; the [`crate::StickyNotes`] component renders that list. Views
//! only ever write to the signal, so driving the controller from a future
//! never subscribes that future to the list.

use dioxus::prelude::*;
use store::NoteKey;

use crate::controller::{NoteBoard, NoteView};

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedNote {
    pub key: NoteKey,
    pub message: String,
}

#[derive(Clone, Copy)]
pub struct SignalBoard {
    notes: Signal<Vec<RenderedNote>>,
}

impl SignalBoard {
    pub fn new(notes: Signal<Vec<RenderedNote>>) -> Self {
        Self { notes }
    }
}

pub struct SignalNoteView {
    key: NoteKey,
    notes: Signal<Vec<RenderedNote>>,
}

impl NoteBoard for SignalBoard {
    type View = SignalNoteView;

    fn create(&mut self, key: NoteKey) -> SignalNoteView {
        self.notes.write().insert(
            0,
            RenderedNote {
                key,
                message: String::new(),
            },
        );
        SignalNoteView {
            key,
            notes: self.notes,
        }
    }
}

impl NoteView for SignalNoteView {
    fn update(&mut self, message: &str) {
        let key = self.key;
        let mut notes = self.notes.write();
        if let Some(note) = notes.iter_mut().find(|n| n.key == key) {
            note.message = message.to_string();
        }
    }

    fn remove(self) {
        let key = self.key;
        let mut notes = self.notes;
        notes.write().retain(|n| n.key != key);
    }
}
