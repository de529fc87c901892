//! The product source seam used by the catalog session and detail resolver.

use std::future::Future;

use economia_core::Product;

use crate::client::CatalogClient;
use crate::error::ClientError;

/// A source of normalized products.
///
/// [`CatalogClient`] is the HTTP implementation; tests substitute in-memory
/// fakes.
pub trait ProductGateway {
    /// Fetches one page. A non-empty `search_term` selects the name search,
    /// which ignores `cursor` and `limit`; an empty term selects the cursor
    /// listing.
    fn fetch_page(
        &self,
        cursor: &str,
        limit: usize,
        search_term: &str,
    ) -> impl Future<Output = Result<Vec<Product>, ClientError>> + Send;

    /// Fetches a single product.
    fn fetch_by_id(&self, id: &str) -> impl Future<Output = Result<Product, ClientError>> + Send;
}

impl ProductGateway for CatalogClient {
    async fn fetch_page(
        &self,
        cursor: &str,
        limit: usize,
        search_term: &str,
    ) -> Result<Vec<Product>, ClientError> {
        if search_term.is_empty() {
            self.list_products(cursor, limit).await
        } else {
            self.search_products(search_term).await
        }
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Product, ClientError> {
        self.get_product(id).await
    }
}
