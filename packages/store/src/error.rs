use thiserror::Error;

/// Errors raised by a [`crate::NoteStore`] backend or while loading configuration.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying medium cannot be reached (no `localStorage`, sandboxed frame, ...).
    #[error("note storage is unavailable: {0}")]
    Unavailable(String),

    /// The medium refused a write, usually because its quota is exhausted.
    #[error("failed to write note {key}: {reason}")]
    Write { key: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Returned when a string is not a decimal millisecond timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid note key {value:?}")]
pub struct ParseNoteKeyError {
    pub value: String,
}
