//! Resolves the product shown by the detail view.

use economia_client::ProductGateway;
use economia_core::{lowest_price, sorted_prices, Product, ProductPrice};

use crate::error::DetailError;

/// Where the detail view's product came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSource {
    /// Handed over from the loaded list.
    Carried,
    /// Fetched by id.
    Fetched,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub product: Product,
    /// Every price, ascending, with the first entry flagged as the lowest.
    pub prices: Vec<ProductPrice>,
    pub source: DetailSource,
}

impl ProductDetail {
    fn new(product: Product, source: DetailSource) -> Self {
        let prices = sorted_prices(&product);
        Self {
            product,
            prices,
            source,
        }
    }

    /// The highlighted lowest price.
    #[must_use]
    pub fn lowest(&self) -> Option<&ProductPrice> {
        self.prices.first()
    }

    /// True when the product carries no prices at all.
    #[must_use]
    pub fn no_price_available(&self) -> bool {
        !self.product.has_prices()
    }
}

/// Builds the detail view for `id`.
///
/// A carried product is used as-is with no fetch. Otherwise the product is
/// fetched through `gateway`.
///
/// # Errors
///
/// Returns [`DetailError::ProductNotFound`] when `id` is empty or the fetch
/// fails.
pub async fn resolve_detail<G: ProductGateway>(
    gateway: &G,
    id: &str,
    carried: Option<Product>,
) -> Result<ProductDetail, DetailError> {
    if let Some(product) = carried {
        tracing::debug!(id = %product.id, "detail view using carried product");
        return Ok(ProductDetail::new(product, DetailSource::Carried));
    }

    let id = id.trim();
    if id.is_empty() {
        return Err(DetailError::ProductNotFound {
            id: String::new(),
            source: None,
        });
    }

    match gateway.fetch_by_id(id).await {
        Ok(product) => {
            tracing::debug!(id, lowest = ?lowest_price(&product).map(|p| p.price), "detail view fetched product");
            Ok(ProductDetail::new(product, DetailSource::Fetched))
        }
        Err(err) => {
            tracing::warn!(id, error = %err, "product lookup failed");
            Err(DetailError::ProductNotFound {
                id: id.to_owned(),
                source: Some(err),
            })
        }
    }
}
