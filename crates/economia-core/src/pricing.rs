//! Lowest-price ranking for product summaries and detail views.
//!
//! The `is_lowest_price` flag is a view artifact: every function here
//! recomputes it from scratch and ignores whatever the input carried.

use crate::products::{Product, ProductPrice};

/// Number of prices shown on a product summary card.
pub const SUMMARY_PRICE_COUNT: usize = 3;

/// Returns all prices sorted ascending, with only the first marked lowest.
///
/// The sort is stable, so equal prices keep their original relative order
/// and the first-encountered entry wins the highlight.
#[must_use]
pub fn sorted_prices(product: &Product) -> Vec<ProductPrice> {
    let mut prices = product.prices.clone();
    prices.sort_by(|a, b| a.price.total_cmp(&b.price));
    for (idx, price) in prices.iter_mut().enumerate() {
        price.is_lowest_price = idx == 0;
    }
    prices
}

/// Returns at most `n` of the cheapest prices, ascending, first marked lowest.
#[must_use]
pub fn top_n_lowest(product: &Product, n: usize) -> Vec<ProductPrice> {
    let mut prices = sorted_prices(product);
    prices.truncate(n);
    prices
}

/// The single highlighted entry of the detail view, or `None` when the
/// product has no prices ("no price available").
#[must_use]
pub fn lowest_price(product: &Product) -> Option<ProductPrice> {
    sorted_prices(product).into_iter().next()
}

/// Formats a price for display, e.g. `19.9` → `"R$ 19.90"`.
#[must_use]
pub fn format_brl(price: f64) -> String {
    format!("R$ {price:.2}")
}
