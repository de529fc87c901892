//! Plain-text rendering of the list and detail views.

use economia_catalog::{CatalogSession, KeyedStorage, Phase, ProductDetail};
use economia_core::{format_brl, top_n_lowest, Product, ProductPrice, SUMMARY_PRICE_COUNT};

const LOWEST_LABEL: &str = "Menor preço";
const NO_PRICE: &str = "Nenhum preço disponível";
const END_OF_LIST: &str = "Você chegou ao fim da lista de produtos.";
const DETAIL_IMAGE_SIZE: u32 = 300;

pub(crate) fn list<S: KeyedStorage>(session: &CatalogSession<S>) -> String {
    let mut lines = vec![session.headline(), String::new()];

    if let Phase::Error { message } = session.phase() {
        lines.push(message.clone());
        return finish(&lines);
    }
    if let Some(empty) = session.empty_message() {
        lines.push(empty);
        return finish(&lines);
    }

    for product in session.products() {
        lines.extend(card_lines(product));
        lines.push(String::new());
    }

    if let Some(notice) = session.notice() {
        lines.push(format!("{}: {}", notice.title, notice.description));
    }
    if session.reached_end() {
        lines.push(END_OF_LIST.to_owned());
    } else if session.has_more() {
        lines.push(format!(
            "{} produtos carregados. Use `economia more` para ver mais.",
            session.products().len()
        ));
    }
    finish(&lines)
}

/// A summary card: name, category and the three lowest prices.
pub(crate) fn card(product: &Product) -> String {
    finish(&card_lines(product))
}

fn card_lines(product: &Product) -> Vec<String> {
    let mut lines = vec![format!("#{} {}", product.id, product.name)];
    if !product.category.is_empty() {
        lines.push(format!("    {}", product.category));
    }
    if !product.has_prices() {
        lines.push(format!("    {NO_PRICE}"));
    }
    lines.extend(
        top_n_lowest(product, SUMMARY_PRICE_COUNT)
            .iter()
            .map(|price| format!("    {}", price_line(price))),
    );
    lines
}

pub(crate) fn detail(detail: &ProductDetail) -> String {
    let product = &detail.product;
    let mut lines = vec![product.name.clone()];
    if !product.category.is_empty() {
        lines.push(format!("Categoria: {}", product.category));
    }
    if let Some(description) = &product.description {
        lines.push(description.clone());
    }
    lines.push(format!(
        "Imagem: {}",
        product.image_or_placeholder(DETAIL_IMAGE_SIZE)
    ));
    lines.push(String::new());

    if detail.no_price_available() {
        lines.push(NO_PRICE.to_owned());
        return finish(&lines);
    }
    lines.push("Preços:".to_owned());
    lines.extend(detail.prices.iter().map(|price| format!("  {}", price_line(price))));
    finish(&lines)
}

pub(crate) fn not_found() -> String {
    "Produto não encontrado\nUse `economia list` para voltar à lista de produtos.\n".to_owned()
}

fn price_line(price: &ProductPrice) -> String {
    let line = format!("{:>10}  {}", format_brl(price.price), price.supermarket_name);
    if price.is_lowest_price {
        format!("{line}  ({LOWEST_LABEL})")
    } else {
        line
    }
}

/// Joins lines with a trailing newline.
fn finish(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
