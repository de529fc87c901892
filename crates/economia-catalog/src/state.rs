//! Catalog state types: the phase machine, cursor and page requests.

use std::fmt;

use economia_core::Product;
use serde::{Deserialize, Serialize};

/// The last loaded product id, sent as the next page token.
///
/// Not an offset: the server returns items strictly after this id in its
/// own ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Token for the first listing page.
    #[must_use]
    pub fn initial() -> Self {
        Self("0".to_owned())
    }

    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_initial(&self) -> bool {
        self.0 == "0"
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Nothing requested yet.
    Idle,
    LoadingFirstPage,
    Ready,
    LoadingMore,
    /// The first page failed; the grid is replaced by `message`.
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    First,
    Next,
}

/// A fetch the session wants performed.
///
/// Hand the completion back through
/// [`crate::CatalogSession::apply`]. Requests from a superseded search
/// generation are discarded on apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub kind: PageKind,
    pub cursor: Cursor,
    pub limit: usize,
    pub search_term: String,
    pub(crate) generation: u64,
}

impl PageRequest {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A transient, non-fatal message (e.g. a failed "load more").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

/// Everything the product list view renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    /// Append-only within a search; insertion order is fetch order.
    pub loaded_products: Vec<Product>,
    pub cursor: Cursor,
    /// The committed search term (not the input buffer).
    pub search_term: String,
    pub has_more: bool,
    pub phase: Phase,
}

impl CatalogState {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            loaded_products: Vec::new(),
            cursor: Cursor::initial(),
            search_term: String::new(),
            has_more: true,
            phase: Phase::Idle,
        }
    }

    #[must_use]
    pub fn is_loading_page(&self) -> bool {
        self.phase == Phase::LoadingFirstPage
    }

    #[must_use]
    pub fn is_loading_more(&self) -> bool {
        self.phase == Phase::LoadingMore
    }

    #[must_use]
    pub fn is_search(&self) -> bool {
        !self.search_term.is_empty()
    }
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::empty()
    }
}
