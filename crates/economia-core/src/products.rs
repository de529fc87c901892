use serde::{Deserialize, Serialize};

/// Name used for a price entry whose supermarket name is unknown.
pub const DEFAULT_SUPERMARKET_NAME: &str = "Supermercado";

/// A retailer whose prices are compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supermarket {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// The price of a product at one supermarket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPrice {
    pub supermarket_id: String,
    pub supermarket_name: String,
    /// Price in currency units (BRL). Displayed with two decimals.
    pub price: f64,
    /// Display-only highlight computed by [`crate::pricing::top_n_lowest`].
    ///
    /// Never read from upstream payloads and never written to persisted state.
    #[serde(skip)]
    pub is_lowest_price: bool,
}

impl ProductPrice {
    #[must_use]
    pub fn new(supermarket_id: impl Into<String>, supermarket_name: impl Into<String>, price: f64) -> Self {
        Self {
            supermarket_id: supermarket_id.into(),
            supermarket_name: supermarket_name.into(),
            price,
            is_lowest_price: false,
        }
    }
}

/// A catalog product in canonical shape.
///
/// `prices` is always a sequence here; heterogeneous upstream shapes are
/// coerced by the client's normalizer before a `Product` is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable product id, also the pagination cursor value.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub prices: Vec<ProductPrice>,
}

impl Product {
    /// Returns the product image, or a sized placeholder when none is set.
    #[must_use]
    pub fn image_or_placeholder(&self, size: u32) -> String {
        match &self.image {
            Some(url) => url.clone(),
            None => format!("https://placehold.co/{size}x{size}?text=Produto"),
        }
    }

    #[must_use]
    pub fn has_prices(&self) -> bool {
        !self.prices.is_empty()
    }
}
