//! # Note keys and change notifications
//!
//! A note is identified by the millisecond timestamp at which it was created,
//! written as a decimal string in the shared medium (`"1581033600000"`). The
//! [`NoteKey`] newtype carries that value and derives the creation date shown
//! on each rendered note.
//!
//! ## Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`NoteKey`] | Parsed note identifier. Ordered by creation time. |
//! | [`KeyGenerator`] | Issues strictly increasing keys for one context. |
//! | [`StoreChange`] | A mutation made by another context, as delivered to subscribers. |
//!
//! Two notes created in the same millisecond by one context get consecutive
//! keys. Two contexts writing in the same millisecond can still collide; the
//! last write wins.

use std::fmt;
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone, Utc};

use crate::config::DEFAULT_DATE_FORMAT;
use crate::error::ParseNoteKeyError;

/// Creation-time identifier of a note.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteKey(u64);

impl NoteKey {
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn millis(&self) -> u64 {
        self.0
    }

    /// The creation time encoded in the key, or `None` if it is out of range.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.0)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
    }

    /// Human-readable creation label, e.g. `"Created on Feb 7"`.
    ///
    /// Falls back to the current time for keys outside the representable
    /// range, and to [`DEFAULT_DATE_FORMAT`] when `format` is not a valid
    /// strftime string.
    pub fn created_label<Tz>(&self, tz: &Tz, format: &str) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let created = self.created_at().unwrap_or_else(Utc::now).with_timezone(tz);
        let format = if is_valid_date_format(format) {
            format
        } else {
            DEFAULT_DATE_FORMAT
        };
        format!("Created on {}", created.format(format))
    }
}

impl fmt::Display for NoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteKey {
    type Err = ParseNoteKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseNoteKeyError {
                value: s.to_string(),
            });
        }
        s.parse::<u64>().map(Self).map_err(|_| ParseNoteKeyError {
            value: s.to_string(),
        })
    }
}

/// Whether `format` parses as a chrono strftime string.
pub fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Issues keys from the wall clock, bumping by one millisecond whenever the
/// clock has not advanced past the previously issued key.
#[derive(Clone, Debug, Default)]
pub struct KeyGenerator {
    last: Option<u64>,
}

impl KeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> NoteKey {
        self.next_at(current_millis())
    }

    /// Issue a key for the given clock reading.
    pub fn next_at(&mut self, now_millis: u64) -> NoteKey {
        let millis = match self.last {
            Some(last) if now_millis <= last => last + 1,
            _ => now_millis,
        };
        self.last = Some(millis);
        NoteKey(millis)
    }
}

/// A mutation observed in the shared medium, made by some other context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreChange {
    /// `new_value` is `None` when the note was removed.
    Updated {
        key: NoteKey,
        new_value: Option<String>,
    },
    /// The whole medium was cleared.
    Cleared,
}

/// Milliseconds since the Unix epoch.
pub fn current_millis() -> u64 {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
