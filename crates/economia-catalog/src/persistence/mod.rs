//! Snapshot and restore of the catalog list across reloads and navigation.
//!
//! Persisted state lives in a single keyed store behind [`KeyedStorage`].
//! Each field sits under its own key so that a missing or corrupt field
//! falls back to its default without discarding the others.

mod file;
mod memory;

use economia_core::Product;

use crate::error::StorageError;
use crate::state::Cursor;

pub use file::FileStorage;
pub use memory::MemoryStorage;

pub const PRODUCTS_KEY: &str = "economia-market-products";
pub const CURSOR_KEY: &str = "economia-market-cursor";
pub const SCROLL_POSITION_KEY: &str = "economia-market-scroll-position";
pub const SEARCH_TERM_KEY: &str = "economia-market-search-term";
pub const HAS_MORE_KEY: &str = "economia-market-has-more";

const ALL_KEYS: [&str; 5] = [
    PRODUCTS_KEY,
    CURSOR_KEY,
    SCROLL_POSITION_KEY,
    SEARCH_TERM_KEY,
    HAS_MORE_KEY,
];

/// A process-wide string key/value store.
pub trait KeyedStorage {
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// The persisted slice of catalog state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub cursor: Cursor,
    pub search_term: String,
    /// Vertical scroll offset of the list view, in pixels.
    pub scroll_offset: u32,
    /// Whether further listing pages were expected. `None` when nothing was
    /// saved under [`HAS_MORE_KEY`].
    pub has_more: Option<bool>,
}

/// The only writer of persisted catalog state.
pub struct Persistence<S> {
    storage: S,
}

impl<S: KeyedStorage> Persistence<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Writes every field of `snapshot`. Failures are logged, never returned.
    pub fn snapshot(&self, snapshot: &CatalogSnapshot) {
        let products = match serde_json::to_string(&snapshot.products) {
            Ok(json) => json,
            Err(source) => {
                let err = StorageError::Serialize {
                    key: PRODUCTS_KEY.to_owned(),
                    source,
                };
                tracing::warn!(error = %err, "skipping catalog snapshot");
                return;
            }
        };

        let scroll = snapshot.scroll_offset.to_string();
        let writes = [
            (PRODUCTS_KEY, products.as_str()),
            (CURSOR_KEY, snapshot.cursor.as_str()),
            (SEARCH_TERM_KEY, snapshot.search_term.as_str()),
            (SCROLL_POSITION_KEY, scroll.as_str()),
        ];

        for (key, value) in writes {
            if let Err(err) = self.storage.set(key, value) {
                tracing::warn!(key, error = %err, "failed to persist catalog field");
            }
        }

        let has_more = match snapshot.has_more {
            Some(flag) => self.storage.set(HAS_MORE_KEY, if flag { "true" } else { "false" }),
            None => self.storage.remove(HAS_MORE_KEY),
        };
        if let Err(err) = has_more {
            tracing::warn!(key = HAS_MORE_KEY, error = %err, "failed to persist catalog field");
        }

        tracing::debug!(
            products = snapshot.products.len(),
            cursor = %snapshot.cursor,
            search_term = %snapshot.search_term,
            scroll_offset = snapshot.scroll_offset,
            has_more = ?snapshot.has_more,
            "catalog snapshot saved"
        );
    }

    /// Reads the persisted snapshot, defaulting each field independently.
    #[must_use]
    pub fn restore(&self) -> CatalogSnapshot {
        let products = self
            .read(PRODUCTS_KEY)
            .and_then(|raw| match serde_json::from_str::<Vec<Product>>(&raw) {
                Ok(products) => Some(products),
                Err(e) => {
                    tracing::debug!(error = %e, "persisted product list is corrupt; using empty list");
                    None
                }
            })
            .unwrap_or_default();

        let cursor = self
            .read(CURSOR_KEY)
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty())
            .map_or_else(Cursor::initial, Cursor::new);

        let scroll_offset = self
            .read(SCROLL_POSITION_KEY)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(0);

        let search_term = self.read(SEARCH_TERM_KEY).unwrap_or_default();

        let has_more = self
            .read(HAS_MORE_KEY)
            .and_then(|raw| raw.trim().parse::<bool>().ok());

        CatalogSnapshot {
            products,
            cursor,
            search_term,
            scroll_offset,
            has_more,
        }
    }

    /// Removes every persisted field.
    pub fn clear(&self) {
        for key in ALL_KEYS {
            if let Err(err) = self.storage.remove(key) {
                tracing::warn!(key, error = %err, "failed to clear catalog field");
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(key, error = %err, "persisted field unreadable; using default");
                None
            }
        }
    }
}
