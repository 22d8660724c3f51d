//! This crate contains all shared UI for the workspace.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod controller;
pub use controller::{ChangeStream, ControllerError, NoteBoard, NoteController, NoteView};

mod board;
pub use board::{RenderedNote, SignalBoard, SignalNoteView};

mod platform;
pub use platform::{load_config, make_store};

mod sticky_note;
pub use sticky_note::{message_lines, StickyNote};

mod sticky_notes;
pub use sticky_notes::StickyNotes;
