//! Catalog session state for the product price-comparison client.
//!
//! [`CatalogSession`] owns the loaded product list, pagination cursor and
//! committed search term, and mediates between user input, a
//! [`economia_client::ProductGateway`] and the persisted snapshot.

pub mod detail;
pub mod error;
pub mod persistence;
pub mod session;
pub mod state;

pub use detail::{resolve_detail, DetailSource, ProductDetail};
pub use error::{DetailError, StorageError};
pub use persistence::{CatalogSnapshot, FileStorage, KeyedStorage, MemoryStorage, Persistence};
pub use session::{CatalogSession, ScrollRestore};
pub use state::{CatalogState, Cursor, Notice, PageKind, PageRequest, Phase};
