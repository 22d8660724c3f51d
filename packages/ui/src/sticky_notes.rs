use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use futures::StreamExt;
use store::{NoteKey, StickyNotesConfig};

use crate::board::{RenderedNote, SignalBoard};
use crate::controller::NoteController;
use crate::platform::make_store;
use crate::StickyNote;

const STICKY_NOTES_CSS: Asset = asset!("/assets/sticky-notes.css");

/// The note form and the list of notes.
///
/// Notes are loaded from the platform store on mount. Notes added, edited or
/// deleted in other windows show up here as their changes arrive.
#[component]
pub fn StickyNotes(#[props(default)] config: StickyNotesConfig) -> Element {
    let notes = use_signal(Vec::<RenderedNote>::new);
    let mut input = use_signal(String::new);
    let mut available = use_signal(|| true);

    let controller = use_hook({
        let storage = config.storage.clone();
        move || {
            let board = SignalBoard::new(notes);
            Rc::new(RefCell::new(NoteController::new(make_store(&storage), board)))
        }
    });

    // Load stored notes, then follow changes made by other windows.
    let ctrl = controller.clone();
    use_future(move || {
        let ctrl = ctrl.clone();
        async move {
            let initialized = ctrl.borrow_mut().initialize();
            let mut changes = match initialized {
                Ok(changes) => changes,
                Err(e) => {
                    tracing::error!("Notes are read-only: {e}");
                    available.set(false);
                    return;
                }
            };
            while let Some(change) = changes.next().await {
                ctrl.borrow_mut().apply_change(change);
            }
        }
    });

    let ctrl = controller.clone();
    let on_delete = use_callback(move |key: NoteKey| {
        if let Err(e) = ctrl.borrow_mut().delete_note(key) {
            tracing::error!("Could not delete note {key}: {e}");
        }
    });

    let ctrl = controller.clone();
    let save = move |_| {
        let message = input.peek().clone();
        let saved = ctrl.borrow_mut().save_note(&message);
        match saved {
            Ok(Some(_)) => input.set(String::new()),
            Ok(None) => {}
            Err(e) => tracing::error!("Could not save note: {e}"),
        }
    };

    let submit_enabled = available() && controller.borrow().submit_enabled(&input());
    let date_format = config.notes.date_format.clone();
    let rendered: Vec<RenderedNote> = notes
        .read()
        .iter()
        .filter(|n| !n.message.is_empty())
        .cloned()
        .collect();

    rsx! {
        document::Stylesheet { href: STICKY_NOTES_CSS }

        main {
            class: "sticky-notes",

            div {
                class: "note-form",
                textarea {
                    id: "message",
                    rows: "3",
                    placeholder: "Message...",
                    disabled: !available(),
                    value: "{input}",
                    oninput: move |evt: FormEvent| input.set(evt.value()),
                }
                button {
                    id: "save",
                    disabled: !submit_enabled,
                    onclick: save,
                    "Add note"
                }
            }

            if !available() {
                p {
                    class: "storage-notice",
                    "Local storage is unavailable, so notes cannot be saved."
                }
            }

            section {
                id: "notes-container",
                class: "notes-container",
                h2 { id: "notes-section-title", "Notes" }
                for note in rendered {
                    StickyNote {
                        key: "{note.key}",
                        note_key: note.key,
                        message: note.message,
                        date_format: date_format.clone(),
                        on_delete,
                    }
                }
            }
        }
    }
}
