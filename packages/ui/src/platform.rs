//! Platform-appropriate note store and configuration.
//!
//! - **Web** (WASM + `web` feature): `localStorage` via [`store::LocalStorageStore`]
//! - **Desktop** (native): one file per note via [`store::FileStore`] under
//!   `<data_dir>/sticky-notes/`

use store::config::StorageConfig;
use store::{NoteStore, StickyNotesConfig};

/// Create the note store for the current platform.
pub fn make_store(config: &StorageConfig) -> impl NoteStore {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::LocalStorageStore::new(config.clone())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        store::FileStore::new(data_dir(), config.clone())
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        tracing::warn!("Built without the `web` feature, notes will not persist");
        store::MemoryMedium::new().open_context_with(config.clone())
    }
}

/// Load `sticky-notes.toml` from the data directory, falling back to the
/// default configuration if it is missing or invalid.
pub fn load_config() -> StickyNotesConfig {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let path = data_dir().join(StickyNotesConfig::filename());
        match StickyNotesConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring {}: {e}", path.display());
                StickyNotesConfig::default()
            }
        }
    }
    #[cfg(target_arch = "wasm32")]
    {
        StickyNotesConfig::default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn data_dir() -> std::path::PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("sticky-notes")
}
