use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use economia_catalog::{CatalogSession, CatalogSnapshot, Cursor, MemoryStorage, Persistence};
use economia_client::{ClientError, FetchFailure, Operation, ProductGateway};
use economia_core::{Product, ProductPrice};

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["economia"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn list_defaults_to_no_extra_pages() {
    let cli = Cli::try_parse_from(["economia", "list"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::List { pages: 0 })));
}

#[test]
fn list_accepts_pages() {
    let cli =
        Cli::try_parse_from(["economia", "list", "--pages", "3"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::List { pages: 3 })));
}

#[test]
fn search_takes_the_term() {
    let cli = Cli::try_parse_from(["economia", "search", "arroz integral"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Search { ref term }) if term == "arroz integral"
    ));
}

#[test]
fn search_requires_a_term() {
    assert!(Cli::try_parse_from(["economia", "search"]).is_err());
}

#[test]
fn show_takes_the_id() {
    let cli = Cli::try_parse_from(["economia", "show", "42"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Show { ref id }) if id == "42"));
}

#[test]
fn parses_more_and_reset() {
    let more = Cli::try_parse_from(["economia", "more"]).expect("expected valid cli args");
    assert!(matches!(more.command, Some(Commands::More)));
    let reset = Cli::try_parse_from(["economia", "reset"]).expect("expected valid cli args");
    assert!(matches!(reset.command, Some(Commands::Reset)));
}

// ---------------------------------------------------------------------------
// rendering
// ---------------------------------------------------------------------------

fn feijao() -> Product {
    Product {
        id: "7".to_owned(),
        name: "Feijão Carioca 1kg".to_owned(),
        image: None,
        description: None,
        category: "Mercearia".to_owned(),
        prices: vec![
            ProductPrice::new("1", "Carrefour", 8.99),
            ProductPrice::new("2", "Extra", 7.5),
            ProductPrice::new("3", "Assaí", 6.89),
            ProductPrice::new("4", "Pão de Açúcar", 9.9),
        ],
    }
}

#[test]
fn card_shows_three_lowest_prices_with_highlight() {
    let card = render::card(&feijao());
    assert!(card.starts_with("#7 Feijão Carioca 1kg\n"));
    assert!(card.contains("R$ 6.89  Assaí  (Menor preço)"));
    assert!(card.contains("R$ 7.50  Extra\n"));
    assert!(card.contains("R$ 8.99  Carrefour\n"));
    assert!(!card.contains("Pão de Açúcar"));
    assert_eq!(card.matches("Menor preço").count(), 1);
}

#[test]
fn card_without_prices_says_so() {
    let mut product = feijao();
    product.prices.clear();
    assert!(render::card(&product).contains("Nenhum preço disponível"));
}

#[test]
fn list_in_error_shows_only_the_message() {
    let mut session = CatalogSession::new(Persistence::new(MemoryStorage::new()), 10);
    let request = session.mount().expect("first page");
    session.apply(
        &request,
        Err(unavailable()),
    );
    let out = render::list(&session);
    assert!(out.starts_with("Produtos populares\n"));
    assert!(out.contains("Não foi possível carregar os produtos"));
}

#[test]
fn list_shows_end_marker_after_short_page() {
    let mut session = CatalogSession::new(Persistence::new(MemoryStorage::new()), 10);
    let request = session.mount().expect("first page");
    session.apply(&request, Ok(vec![feijao()]));
    let out = render::list(&session);
    assert!(out.contains("#7 Feijão Carioca 1kg"));
    assert!(out.ends_with("Você chegou ao fim da lista de produtos.\n"));
}

#[test]
fn list_with_no_results_names_the_term() {
    let mut session = CatalogSession::new(Persistence::new(MemoryStorage::new()), 10);
    session.set_search_input("caviar");
    let request = session.commit_search().expect("search");
    session.apply(&request, Ok(Vec::new()));
    let out = render::list(&session);
    assert!(out.starts_with("Resultados para \"caviar\"\n"));
    assert!(out.contains("Nenhum produto encontrado para \"caviar\""));
}

#[test]
fn not_found_offers_a_way_back() {
    let out = render::not_found();
    assert!(out.starts_with("Produto não encontrado"));
    assert!(out.contains("economia list"));
}

#[test]
fn detail_lists_every_price_ascending() {
    let product = feijao();
    let detail = economia_catalog::ProductDetail {
        prices: economia_core::sorted_prices(&product),
        product,
        source: economia_catalog::DetailSource::Carried,
    };
    let out = render::detail(&detail);
    let assai = out.find("Assaí").expect("assaí listed");
    let pao = out.find("Pão de Açúcar").expect("pão de açúcar listed");
    assert!(assai < pao);
    assert!(out.contains("Imagem: https://placehold.co/300x300?text=Produto"));
    assert!(out.contains("Categoria: Mercearia"));
}

// ---------------------------------------------------------------------------
// command handlers
// ---------------------------------------------------------------------------

fn unavailable() -> ClientError {
    ClientError::FetchFailed {
        operation: Operation::ListPage {
            cursor: "0".to_owned(),
            limit: 10,
        },
        reason: FetchFailure::UnexpectedStatus {
            status: 503,
            url: "http://localhost/produto/buscarProdutos".to_owned(),
        },
    }
}

fn numbered(ids: std::ops::RangeInclusive<usize>) -> Vec<Product> {
    ids.map(|id| Product {
        id: id.to_string(),
        name: format!("Produto {id}"),
        ..feijao()
    })
    .collect()
}

fn memory_session() -> CatalogSession<MemoryStorage> {
    CatalogSession::new(Persistence::new(MemoryStorage::new()), 10)
}

/// Serves canned pages in order and counts by-id lookups.
#[derive(Default)]
struct StubGateway {
    pages: Mutex<VecDeque<Result<Vec<Product>, ClientError>>>,
    page_calls: Mutex<Vec<(String, String)>>,
    by_id_calls: AtomicUsize,
}

impl StubGateway {
    fn with_pages(pages: Vec<Result<Vec<Product>, ClientError>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            ..Self::default()
        }
    }

    fn page_calls(&self) -> Vec<(String, String)> {
        self.page_calls.lock().unwrap().clone()
    }
}

impl ProductGateway for StubGateway {
    async fn fetch_page(
        &self,
        cursor: &str,
        _limit: usize,
        search_term: &str,
    ) -> Result<Vec<Product>, ClientError> {
        self.page_calls
            .lock()
            .unwrap()
            .push((cursor.to_owned(), search_term.to_owned()));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Product, ClientError> {
        self.by_id_calls.fetch_add(1, Ordering::SeqCst);
        Err(ClientError::FetchFailed {
            operation: Operation::ById { id: id.to_owned() },
            reason: FetchFailure::UnexpectedStatus {
                status: 404,
                url: format!("http://localhost/produto/{id}"),
            },
        })
    }
}

#[tokio::test]
async fn list_fires_the_sentinel_once_per_page() {
    let gateway = StubGateway::with_pages(vec![
        Ok(numbered(1..=10)),
        Ok(numbered(11..=20)),
        Ok(numbered(21..=30)),
    ]);
    let mut session = memory_session();

    let out = catalog::run_list(&mut session, &gateway, 2).await;

    assert_eq!(session.products().len(), 30);
    let cursors: Vec<String> = gateway.page_calls().into_iter().map(|(c, _)| c).collect();
    assert_eq!(cursors, ["0", "10", "20"]);
    assert!(out.contains("30 produtos carregados"));
}

#[tokio::test]
async fn list_stops_paging_after_a_failed_page() {
    let gateway = StubGateway::with_pages(vec![
        Ok(numbered(1..=10)),
        Err(unavailable()),
        Ok(numbered(11..=20)),
    ]);
    let mut session = memory_session();

    let out = catalog::run_list(&mut session, &gateway, 3).await;

    assert_eq!(gateway.page_calls().len(), 2);
    assert_eq!(session.products().len(), 10);
    assert!(out.contains("Erro: Não foi possível carregar mais produtos"));
}

#[tokio::test]
async fn list_stops_paging_at_the_end() {
    let gateway = StubGateway::with_pages(vec![Ok(numbered(1..=10)), Ok(numbered(11..=12))]);
    let mut session = memory_session();

    let out = catalog::run_list(&mut session, &gateway, 5).await;

    assert_eq!(gateway.page_calls().len(), 2);
    assert!(out.ends_with("Você chegou ao fim da lista de produtos.\n"));
}

#[tokio::test]
async fn show_carries_a_loaded_product_and_snapshots() {
    let gateway = StubGateway::with_pages(vec![Ok(numbered(1..=10))]);
    let mut session = memory_session();
    catalog::run_list(&mut session, &gateway, 0).await;
    session.record_scroll(420);

    let out = catalog::run_show(&mut session, &gateway, "3").await;

    assert!(out.starts_with("Produto 3\n"));
    assert!(out.contains("(Menor preço)"));
    assert_eq!(gateway.by_id_calls.load(Ordering::SeqCst), 0);
    let saved = session.persistence().restore();
    assert_eq!(saved.products.len(), 10);
    assert_eq!(saved.scroll_offset, 420);
}

#[tokio::test]
async fn show_of_unknown_product_is_not_found() {
    let gateway = StubGateway::default();
    let mut session = memory_session();

    let out = catalog::run_show(&mut session, &gateway, "999").await;

    assert_eq!(gateway.by_id_calls.load(Ordering::SeqCst), 1);
    assert!(out.starts_with("Produto não encontrado"));
}

#[tokio::test]
async fn search_for_the_saved_term_keeps_saved_results() {
    let persistence = Persistence::new(MemoryStorage::new());
    persistence.snapshot(&CatalogSnapshot {
        products: numbered(1..=2),
        cursor: Cursor::new("2"),
        search_term: "arroz".to_owned(),
        ..CatalogSnapshot::default()
    });
    let mut session = CatalogSession::restore(persistence, 10);
    let gateway = StubGateway::default();

    let out = catalog::run_search(&mut session, &gateway, "arroz").await;

    assert!(gateway.page_calls().is_empty());
    assert!(out.starts_with("Resultados para \"arroz\"\n"));
    assert!(out.contains("#2 Produto 2"));
}

#[tokio::test]
async fn search_trims_the_term_before_committing() {
    let gateway = StubGateway::with_pages(vec![Ok(numbered(5..=6))]);
    let mut session = memory_session();

    catalog::run_search(&mut session, &gateway, "  feijão ").await;

    assert_eq!(gateway.page_calls(), [("0".to_owned(), "feijão".to_owned())]);
    assert_eq!(session.search_term(), "feijão");
    assert_eq!(session.products().len(), 2);
}

#[tokio::test]
async fn reset_returns_to_the_listing() {
    let gateway = StubGateway::with_pages(vec![Ok(numbered(5..=6)), Ok(numbered(1..=10))]);
    let mut session = memory_session();
    catalog::run_search(&mut session, &gateway, "feijão").await;

    let out = catalog::run_reset(&mut session, &gateway).await;

    assert_eq!(session.search_term(), "");
    assert_eq!(session.products().len(), 10);
    assert!(out.starts_with("Produtos populares\n"));
}
