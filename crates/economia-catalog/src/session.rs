//! The pagination/search state machine behind the product list.
//!
//! Transitions are synchronous: every method that starts a fetch resets or
//! updates state immediately and returns the [`PageRequest`] to perform.
//! The completion is handed back through [`CatalogSession::apply`]. The
//! async helpers ([`CatalogSession::start`], [`CatalogSession::load_more`],
//! [`CatalogSession::commit_search_and_load`]) run a request through a
//! [`ProductGateway`] in one call.
//!
//! Only one page fetch is ever in flight: `LoadingMore` blocks further
//! sentinel triggers, and a new first page bumps the search generation so
//! that late responses from a previous search are discarded.

use std::time::Duration;

use economia_client::{ClientError, ProductGateway};
use economia_core::Product;

use crate::persistence::{CatalogSnapshot, KeyedStorage, Persistence};
use crate::state::{CatalogState, Cursor, Notice, PageKind, PageRequest, Phase};

/// Visibility ratio at which the list sentinel requests the next page.
pub const SENTINEL_THRESHOLD: f64 = 0.5;

/// Scroll offset past which the back-to-top control is shown.
pub const BACK_TO_TOP_OFFSET: u32 = 300;

/// Delay between the end of the first loading phase and restoring the scroll offset.
pub const SCROLL_RESTORE_DELAY: Duration = Duration::from_millis(100);

const FIRST_PAGE_ERROR: &str =
    "Não foi possível carregar os produtos. Tente novamente mais tarde.";
const MORE_PAGES_ERROR: &str =
    "Não foi possível carregar mais produtos. Tente novamente mais tarde.";

/// A scroll position the view should apply after [`ScrollRestore::delay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRestore {
    pub offset: u32,
    pub delay: Duration,
}

/// Owns the catalog list, its cursor and search term, and the persisted snapshot.
pub struct CatalogSession<S> {
    state: CatalogState,
    /// Raw search input, promoted to `state.search_term` only on commit.
    input: String,
    limit: usize,
    generation: u64,
    scroll_offset: u32,
    pending_scroll: Option<u32>,
    notice: Option<Notice>,
    persistence: Persistence<S>,
}

impl<S: KeyedStorage> CatalogSession<S> {
    /// Starts a session with an empty list, ignoring anything persisted.
    ///
    /// `limit` is clamped to at least 1.
    pub fn new(persistence: Persistence<S>, limit: usize) -> Self {
        Self {
            state: CatalogState::empty(),
            input: String::new(),
            limit: limit.max(1),
            generation: 0,
            scroll_offset: 0,
            pending_scroll: None,
            notice: None,
            persistence,
        }
    }

    /// Starts a session from the persisted snapshot.
    ///
    /// A non-empty restored list puts the session straight into `Ready`, so
    /// [`Self::mount`] does not re-fetch page one. `has_more` is restored as
    /// saved. Snapshots without it fall back to [`derive_has_more`].
    pub fn restore(persistence: Persistence<S>, limit: usize) -> Self {
        let snapshot = persistence.restore();
        let mut session = Self::new(persistence, limit);

        session.input.clone_from(&snapshot.search_term);
        session.state.search_term = snapshot.search_term;
        session.scroll_offset = snapshot.scroll_offset;
        session.pending_scroll = Some(snapshot.scroll_offset).filter(|&offset| offset > 0);

        if !snapshot.products.is_empty() {
            session.state.has_more = snapshot.has_more.unwrap_or_else(|| {
                derive_has_more(
                    snapshot.products.len(),
                    session.limit,
                    &session.state.search_term,
                )
            });
            session.state.loaded_products = snapshot.products;
            session.state.cursor = snapshot.cursor;
            session.state.phase = Phase::Ready;
        }

        tracing::debug!(
            products = session.state.loaded_products.len(),
            cursor = %session.state.cursor,
            search_term = %session.state.search_term,
            has_more = session.state.has_more,
            "catalog session restored"
        );
        session
    }

    // -----------------------------------------------------------------------
    // transitions
    // -----------------------------------------------------------------------

    /// Called when the list view mounts. Requests page one unless a restored
    /// list is already showing.
    pub fn mount(&mut self) -> Option<PageRequest> {
        match self.state.phase {
            Phase::Idle => Some(self.begin_first_page()),
            _ => None,
        }
    }

    /// Buffers raw keystroke input without fetching.
    pub fn set_search_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    #[must_use]
    pub fn search_input(&self) -> &str {
        &self.input
    }

    /// Promotes the input buffer to the committed search term and requests
    /// page one for it.
    ///
    /// Committing the term already in effect is a no-op, except from `Idle`
    /// or `Error` where it (re)loads page one.
    pub fn commit_search(&mut self) -> Option<PageRequest> {
        let unchanged = self.input == self.state.search_term;
        if unchanged && !matches!(self.state.phase, Phase::Idle | Phase::Error { .. }) {
            return None;
        }
        self.state.search_term.clone_from(&self.input);
        tracing::info!(search_term = %self.state.search_term, "search committed");
        Some(self.begin_first_page())
    }

    /// Clears persisted state and the committed search, then requests page one.
    pub fn reset(&mut self) -> PageRequest {
        self.persistence.clear();
        self.input.clear();
        self.state.search_term.clear();
        self.scroll_offset = 0;
        self.pending_scroll = None;
        tracing::info!("catalog state reset");
        self.begin_first_page()
    }

    /// The list sentinel reports its visible fraction.
    ///
    /// Requests the next page once at least half of it is visible.
    pub fn sentinel_visible(&mut self, visible_ratio: f64) -> Option<PageRequest> {
        if visible_ratio < SENTINEL_THRESHOLD {
            return None;
        }
        self.request_more()
    }

    /// The manual "load more" control. Same guard as the sentinel.
    pub fn request_more(&mut self) -> Option<PageRequest> {
        if self.state.phase != Phase::Ready || !self.state.has_more {
            return None;
        }
        self.state.phase = Phase::LoadingMore;
        Some(self.page_request(PageKind::Next))
    }

    /// Applies a completed fetch. Returns `false` if the response was stale
    /// and discarded.
    pub fn apply(
        &mut self,
        request: &PageRequest,
        result: Result<Vec<Product>, ClientError>,
    ) -> bool {
        if request.generation != self.generation {
            tracing::debug!(
                request_generation = request.generation,
                current_generation = self.generation,
                "discarding response for a superseded search"
            );
            return false;
        }

        match request.kind {
            PageKind::First if self.state.phase == Phase::LoadingFirstPage => {
                self.apply_first_page(result);
                true
            }
            PageKind::Next if self.state.phase == Phase::LoadingMore => {
                self.apply_next_page(result);
                true
            }
            _ => {
                tracing::debug!(kind = ?request.kind, phase = ?self.state.phase, "discarding unexpected page response");
                false
            }
        }
    }

    fn apply_first_page(&mut self, result: Result<Vec<Product>, ClientError>) {
        match result {
            Ok(products) => {
                let count = products.len();
                if let Some(last) = products.last() {
                    self.state.cursor = Cursor::new(last.id.clone());
                }
                self.state.has_more = self.page_may_continue(count);
                self.state.loaded_products = products;
                self.state.phase = Phase::Ready;
                tracing::info!(count, has_more = self.state.has_more, "first page loaded");
            }
            Err(err) => {
                tracing::warn!(error = %err, "first page failed");
                self.state.loaded_products.clear();
                self.state.phase = Phase::Error {
                    message: FIRST_PAGE_ERROR.to_owned(),
                };
            }
        }
    }

    fn apply_next_page(&mut self, result: Result<Vec<Product>, ClientError>) {
        match result {
            Ok(products) => {
                let count = products.len();
                if let Some(last) = products.last() {
                    self.state.cursor = Cursor::new(last.id.clone());
                }
                self.state.has_more = count > 0 && self.page_may_continue(count);
                self.state.loaded_products.extend(products);
                tracing::info!(
                    count,
                    total = self.state.loaded_products.len(),
                    has_more = self.state.has_more,
                    "next page loaded"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, cursor = %self.state.cursor, "next page failed");
                self.notice = Some(Notice {
                    title: "Erro".to_owned(),
                    description: MORE_PAGES_ERROR.to_owned(),
                });
            }
        }
        self.state.phase = Phase::Ready;
    }

    fn begin_first_page(&mut self) -> PageRequest {
        self.generation += 1;
        self.state.loaded_products.clear();
        self.state.cursor = Cursor::initial();
        self.state.has_more = true;
        self.state.phase = Phase::LoadingFirstPage;
        self.notice = None;
        self.page_request(PageKind::First)
    }

    fn page_request(&self, kind: PageKind) -> PageRequest {
        PageRequest {
            kind,
            cursor: self.state.cursor.clone(),
            limit: self.limit,
            search_term: self.state.search_term.clone(),
            generation: self.generation,
        }
    }

    /// Search results arrive as one complete set, so only listing pages continue.
    fn page_may_continue(&self, count: usize) -> bool {
        !self.state.is_search() && count >= self.limit
    }

    // -----------------------------------------------------------------------
    // gateway drivers
    // -----------------------------------------------------------------------

    /// Runs `request` through `gateway` and applies the result.
    pub async fn execute<G: ProductGateway>(&mut self, gateway: &G, request: PageRequest) -> bool {
        let result = gateway
            .fetch_page(request.cursor.as_str(), request.limit, &request.search_term)
            .await;
        self.apply(&request, result)
    }

    /// Mounts the list and loads page one if needed.
    pub async fn start<G: ProductGateway>(&mut self, gateway: &G) {
        if let Some(request) = self.mount() {
            self.execute(gateway, request).await;
        }
    }

    /// Loads the next page if the session allows it. Returns whether a page
    /// was fetched and applied.
    pub async fn load_more<G: ProductGateway>(&mut self, gateway: &G) -> bool {
        match self.request_more() {
            Some(request) => self.execute(gateway, request).await,
            None => false,
        }
    }

    /// Buffers `term`, commits it, and loads its first page.
    pub async fn commit_search_and_load<G: ProductGateway>(
        &mut self,
        gateway: &G,
        term: impl Into<String>,
    ) {
        self.set_search_input(term);
        if let Some(request) = self.commit_search() {
            self.execute(gateway, request).await;
        }
    }

    /// Clears everything and loads page one.
    pub async fn reset_and_load<G: ProductGateway>(&mut self, gateway: &G) {
        let request = self.reset();
        self.execute(gateway, request).await;
    }

    // -----------------------------------------------------------------------
    // persistence and navigation
    // -----------------------------------------------------------------------

    /// Persists the list, cursor, committed term and scroll offset.
    ///
    /// Call on unload, on teardown and before navigating to a detail view.
    pub fn snapshot(&self) {
        self.persistence.snapshot(&CatalogSnapshot {
            products: self.state.loaded_products.clone(),
            cursor: self.state.cursor.clone(),
            search_term: self.state.search_term.clone(),
            scroll_offset: self.scroll_offset,
            has_more: Some(self.state.has_more),
        });
    }

    /// Snapshots the list and returns the clicked product to carry into the
    /// detail view, if it is loaded.
    pub fn navigate_to_detail(&self, id: &str) -> Option<Product> {
        self.snapshot();
        self.state
            .loaded_products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Records the current scroll offset. Not persisted until the next snapshot.
    pub fn record_scroll(&mut self, offset: u32) {
        self.scroll_offset = offset;
    }

    #[must_use]
    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    #[must_use]
    pub fn show_back_to_top(&self) -> bool {
        self.scroll_offset > BACK_TO_TOP_OFFSET
    }

    /// Releases the restored scroll offset once the first loading phase is over.
    ///
    /// Returns `None` while page one is still loading, and after the offset
    /// has been taken once.
    pub fn take_scroll_restore(&mut self) -> Option<ScrollRestore> {
        if matches!(self.state.phase, Phase::Idle | Phase::LoadingFirstPage) {
            return None;
        }
        self.pending_scroll.take().map(|offset| ScrollRestore {
            offset,
            delay: SCROLL_RESTORE_DELAY,
        })
    }

    // -----------------------------------------------------------------------
    // view accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.state.loaded_products
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.state.phase
    }

    #[must_use]
    pub fn cursor(&self) -> &Cursor {
        &self.state.cursor
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.state.search_term
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.state.has_more
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Takes the pending transient notice, if any.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// The list heading.
    #[must_use]
    pub fn headline(&self) -> String {
        if self.state.is_search() {
            format!("Resultados para \"{}\"", self.state.search_term)
        } else {
            "Produtos populares".to_owned()
        }
    }

    /// Message for a loaded but empty result, if that is what is showing.
    #[must_use]
    pub fn empty_message(&self) -> Option<String> {
        (self.state.phase == Phase::Ready && self.state.loaded_products.is_empty()).then(|| {
            format!(
                "Nenhum produto encontrado para \"{}\"",
                self.state.search_term
            )
        })
    }

    /// True once every page has been loaded.
    #[must_use]
    pub fn reached_end(&self) -> bool {
        self.state.phase == Phase::Ready
            && !self.state.has_more
            && !self.state.loaded_products.is_empty()
    }

    #[must_use]
    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }
}

/// `has_more` for a snapshot that did not save it: a list that is a whole
/// number of pages may have more behind it.
fn derive_has_more(len: usize, limit: usize, search_term: &str) -> bool {
    search_term.is_empty() && len > 0 && len % limit == 0
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
