pub mod config;
pub mod error;
pub mod models;
pub mod note_store;

mod hub;

mod memory;
pub use memory::{MemoryMedium, MemoryStore};

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorageStore;

pub use config::StickyNotesConfig;
pub use error::StoreError;
pub use models::{KeyGenerator, NoteKey, StoreChange};
pub use note_store::{ChangeHandler, NoteStore, Subscription};
