use chrono::Local;
use dioxus::prelude::*;
use store::NoteKey;

use crate::icons::FaTrashCan;
use crate::Icon;

/// One rendered note: its message, creation date and a delete button.
#[component]
pub fn StickyNote(
    note_key: NoteKey,
    message: String,
    /// chrono strftime format for the creation date.
    date_format: String,
    on_delete: EventHandler<NoteKey>,
) -> Element {
    let created = note_key.created_label(&Local, &date_format);
    let lines = message_lines(&message);

    rsx! {
        div {
            class: "sticky-note",
            id: "{note_key}",
            div {
                class: "message",
                for (index, line) in lines.into_iter().enumerate() {
                    if index > 0 {
                        br {}
                    }
                    "{line}"
                }
            }
            div { class: "date", "{created}" }
            button {
                class: "delete",
                title: "Delete note",
                onclick: move |_| on_delete.call(note_key),
                Icon { icon: FaTrashCan, width: 14, height: 14 }
                " Delete"
            }
        }
    }
}

/// Split a message into the lines shown between `<br>`s. Text is rendered as
/// text nodes, so nothing in it is interpreted as markup.
pub fn message_lines(message: &str) -> Vec<&str> {
    message
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        assert_eq!(message_lines("hello"), vec!["hello"]);
    }

    #[test]
    fn test_newlines_become_breaks() {
        assert_eq!(message_lines("a\nb\r\n\nc"), vec!["a", "b", "", "c"]);
        assert_eq!(message_lines("trailing\n"), vec!["trailing", ""]);
    }

    #[test]
    fn test_markup_is_kept_verbatim() {
        assert_eq!(
            message_lines("<b>bold</b>\n&amp;"),
            vec!["<b>bold</b>", "&amp;"]
        );
    }
}
