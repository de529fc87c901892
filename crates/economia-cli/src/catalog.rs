//! Command handlers for the CLI.
//!
//! Each handler drives the catalog session the way the list page would
//! (mount, sentinel, search commit, detail navigation) and returns the text
//! to print. `main` snapshots the session after every command.

use economia_catalog::{resolve_detail, CatalogSession, FileStorage, KeyedStorage, Persistence};
use economia_client::ProductGateway;
use economia_core::AppConfig;

use crate::render;

/// Opens the session persisted at `config.state_path`.
pub(crate) fn open_session(config: &AppConfig) -> CatalogSession<FileStorage> {
    let storage = FileStorage::new(&config.state_path);
    CatalogSession::restore(Persistence::new(storage), config.page_size)
}

/// Mounts the list, then lets the sentinel fire up to `pages` times.
pub(crate) async fn run_list<G, S>(
    session: &mut CatalogSession<S>,
    gateway: &G,
    pages: usize,
) -> String
where
    G: ProductGateway,
    S: KeyedStorage,
{
    session.start(gateway).await;
    for _ in 0..pages {
        let Some(request) = session.sentinel_visible(1.0) else {
            break;
        };
        session.execute(gateway, request).await;
        if session.notice().is_some() {
            break;
        }
    }
    render::list(session)
}

/// Commits `term`. Re-committing the saved term keeps the saved results.
pub(crate) async fn run_search<G, S>(
    session: &mut CatalogSession<S>,
    gateway: &G,
    term: &str,
) -> String
where
    G: ProductGateway,
    S: KeyedStorage,
{
    session.commit_search_and_load(gateway, term.trim()).await;
    render::list(session)
}

/// The manual "load more" control.
pub(crate) async fn run_more<G, S>(session: &mut CatalogSession<S>, gateway: &G) -> String
where
    G: ProductGateway,
    S: KeyedStorage,
{
    session.start(gateway).await;
    if !session.load_more(gateway).await && session.notice().is_none() {
        tracing::info!(has_more = session.has_more(), "no further page to load");
    }
    render::list(session)
}

/// Snapshots the list, then resolves the detail view for `id`.
pub(crate) async fn run_show<G, S>(session: &mut CatalogSession<S>, gateway: &G, id: &str) -> String
where
    G: ProductGateway,
    S: KeyedStorage,
{
    let carried = session.navigate_to_detail(id);
    match resolve_detail(gateway, id, carried).await {
        Ok(detail) => render::detail(&detail),
        Err(err) => {
            tracing::debug!(error = %err, "detail view unavailable");
            render::not_found()
        }
    }
}

pub(crate) async fn run_reset<G, S>(session: &mut CatalogSession<S>, gateway: &G) -> String
where
    G: ProductGateway,
    S: KeyedStorage,
{
    session.reset_and_load(gateway).await;
    render::list(session)
}
