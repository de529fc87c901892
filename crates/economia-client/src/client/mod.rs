//! HTTP client for the product API's `/produto` endpoints.

mod encode;

use std::time::Duration;

use economia_core::{AppConfig, Product};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::{ClientError, FetchFailure, Operation};
use crate::normalize::normalize_product;

use encode::encode_component;

/// HTTP client for the product API.
///
/// Every response is normalized into canonical [`Product`]s. Transport
/// failures, non-2xx statuses and undecodable bodies all surface as
/// [`ClientError::FetchFailed`]; there is no retry at this layer.
pub struct CatalogClient {
    client: Client,
    /// Base URL without a trailing slash.
    base_url: String,
}

impl CatalogClient {
    /// Creates a client pointed at `base_url` (e.g. a wiremock server in tests).
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidBaseUrl`] if `base_url` does not parse as a URL.
    /// - [`ClientError::Build`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let trimmed = base_url.trim_end_matches('/');
        Url::parse(trimmed).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            client,
            base_url: trimmed.to_owned(),
        })
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Fetches one cursor-paginated page of products.
    ///
    /// The server returns items strictly after `cursor` in its own ordering.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::FetchFailed`] with [`Operation::ListPage`].
    pub async fn list_products(
        &self,
        cursor: &str,
        limit: usize,
    ) -> Result<Vec<Product>, ClientError> {
        let operation = Operation::ListPage {
            cursor: cursor.to_owned(),
            limit,
        };
        let url = self.listing_url(cursor, limit);
        self.fetch_products(&url, operation).await
    }

    /// Searches products by name. The whole match set comes back in one response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::FetchFailed`] with [`Operation::Search`].
    pub async fn search_products(&self, term: &str) -> Result<Vec<Product>, ClientError> {
        let operation = Operation::Search {
            term: term.to_owned(),
        };
        let url = self.search_url(term);
        self.fetch_products(&url, operation).await
    }

    /// Fetches a single product by id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::FetchFailed`] with [`Operation::ById`].
    pub async fn get_product(&self, id: &str) -> Result<Product, ClientError> {
        let operation = Operation::ById { id: id.to_owned() };
        let url = self.product_url(id);
        tracing::debug!(%url, product_id = id, "fetching product");

        match self.request_json(&url).await {
            Ok(body) => Ok(normalize_product(&body)),
            Err(reason) => {
                tracing::warn!(%operation, error = %reason, "product fetch failed");
                Err(ClientError::FetchFailed { operation, reason })
            }
        }
    }

    async fn fetch_products(
        &self,
        url: &str,
        operation: Operation,
    ) -> Result<Vec<Product>, ClientError> {
        tracing::debug!(%url, "fetching products");

        let result = self.request_json(url).await.and_then(|body| match body {
            Value::Array(items) => Ok(items.iter().map(normalize_product).collect::<Vec<_>>()),
            other => Err(FetchFailure::NotAnArray {
                found: json_type_name(&other),
            }),
        });

        match result {
            Ok(products) => {
                tracing::debug!(%operation, count = products.len(), "products fetched");
                Ok(products)
            }
            Err(reason) => {
                tracing::warn!(%operation, error = %reason, "products fetch failed");
                Err(ClientError::FetchFailed { operation, reason })
            }
        }
    }

    /// GETs `url` and decodes the body as JSON. Any non-2xx status is a failure.
    async fn request_json(&self, url: &str) -> Result<Value, FetchFailure> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchFailure::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Value>(&body).map_err(FetchFailure::Deserialize)
    }

    fn listing_url(&self, cursor: &str, limit: usize) -> String {
        format!(
            "{}/produto/buscarProdutos?cursor={}&limit={limit}",
            self.base_url,
            encode_component(cursor)
        )
    }

    fn search_url(&self, term: &str) -> String {
        format!(
            "{}/produto/buscar-produtos?nome={}",
            self.base_url,
            encode_component(term)
        )
    }

    fn product_url(&self, id: &str) -> String {
        format!("{}/produto/{}", self.base_url, encode_component(id))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
