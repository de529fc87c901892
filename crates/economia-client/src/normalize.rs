//! Normalization from raw product API payloads to [`economia_core::Product`].
//!
//! The product API is loosely typed: `prices` may be missing, `null`, an
//! array, or an object keyed by supermarket id, and scalar fields may be
//! absent or carry the wrong JSON type. Normalization never fails. Every
//! field degrades to an empty or default value, and price entries that
//! cannot be coerced are dropped individually.

use economia_core::{Product, ProductPrice, DEFAULT_SUPERMARKET_NAME};
use serde_json::{Map, Value};

/// Normalizes one raw product object into a [`Product`].
///
/// Non-object input yields a product with every field defaulted.
#[must_use]
pub fn normalize_product(raw: &Value) -> Product {
    let id = raw.get("id").and_then(id_text).unwrap_or_default();

    Product {
        name: string_field(raw, "name").unwrap_or_default(),
        image: string_field(raw, "image"),
        description: string_field(raw, "description"),
        category: string_field(raw, "category").unwrap_or_default(),
        prices: normalize_prices(raw.get("prices"), &id),
        id,
    }
}

/// Coerces the raw `prices` field into a sequence of [`ProductPrice`].
///
/// `product_id` is only used for diagnostics.
#[must_use]
pub fn normalize_prices(raw: Option<&Value>, product_id: &str) -> Vec<ProductPrice> {
    match raw {
        None | Some(Value::Null) => {
            tracing::debug!(product_id, "prices missing; using empty list");
            Vec::new()
        }
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| match entry {
                Value::Object(fields) => Some(price_from_object(
                    fields,
                    fields.get("supermarketId").and_then(id_text).unwrap_or_default(),
                )),
                other => {
                    tracing::debug!(product_id, entry = %other, "dropping non-object price entry");
                    None
                }
            })
            .collect(),
        Some(Value::Object(keyed)) => {
            let prices = prices_from_keyed_map(keyed, product_id);
            if prices.is_empty() {
                tracing::debug!(product_id, "keyed prices had no usable entries; using empty list");
            }
            prices
        }
        Some(other) => {
            tracing::debug!(product_id, prices = %other, "unrecognized prices shape; using empty list");
            Vec::new()
        }
    }
}

/// Converts `{ "<supermarketId>": <object | number>, ... }` into a price list,
/// keeping the order the entries were received in.
fn prices_from_keyed_map(keyed: &Map<String, Value>, product_id: &str) -> Vec<ProductPrice> {
    keyed
        .iter()
        .filter_map(|(supermarket_id, value)| match value {
            Value::Object(fields) => Some(price_from_object(fields, supermarket_id.clone())),
            Value::Number(n) => n.as_f64().map(|price| {
                ProductPrice::new(
                    supermarket_id.clone(),
                    format!("{DEFAULT_SUPERMARKET_NAME} {supermarket_id}"),
                    price,
                )
            }),
            other => {
                tracing::debug!(product_id, supermarket_id = %supermarket_id, value = %other, "dropping price entry");
                None
            }
        })
        .collect()
}

fn price_from_object(fields: &Map<String, Value>, supermarket_id: String) -> ProductPrice {
    let supermarket_name = fields
        .get("supermarketName")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SUPERMARKET_NAME);
    let price = fields.get("price").and_then(Value::as_f64).unwrap_or(0.0);
    ProductPrice::new(supermarket_id, supermarket_name, price)
}

/// Reads a non-empty string field; wrong types and empty strings become `None`.
fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Identifiers arrive as strings or bare numbers.
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
