use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// A single catalog entry, exactly as the source describes it.
///
/// Fields are not validated: a missing field decodes as an empty string so a
/// sparse record still renders.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Product {
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(deserialize_with = "text_or_number")]
    pub price: String,
    pub image: String,
    #[serde(rename = "affiliateLink")]
    pub affiliate_link: String,
}

impl Product {
    /// Lowercased haystack fields used by free-text search.
    pub fn search_fields(&self) -> [String; 3] {
        [
            self.name.to_lowercase(),
            self.description.to_lowercase(),
            self.category.to_lowercase(),
        ]
    }
}

/// Accept `"$5"`, `5` and `4.99` alike; the price is display text only.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Catalog document
// ---------------------------------------------------------------------------

/// Why a catalog document could not be turned into a product list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("response is not valid JSON ({0})")]
    NotJson(String),
    #[error("Invalid JSON structure: expected an object with a \"products\" array")]
    MissingProducts,
    #[error("Invalid JSON structure: expected an object with a \"products\" array")]
    NotAnArray,
    #[error("product #{index} is not a product object ({reason})")]
    BadEntry { index: usize, reason: String },
}

/// Parse a `{"products": [...]}` document into an ordered product list.
///
/// Any element that is not an object rejects the whole document, so a
/// malformed set is never partially shown.
pub fn parse_catalog(body: &str) -> Result<Vec<Product>, ShapeError> {
    let data: Value = serde_json::from_str(body).map_err(|e| ShapeError::NotJson(e.to_string()))?;

    let products = data.get("products").ok_or(ShapeError::MissingProducts)?;
    let entries = products.as_array().ok_or(ShapeError::NotAnArray)?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            if !entry.is_object() {
                return Err(ShapeError::BadEntry {
                    index,
                    reason: "expected an object".to_string(),
                });
            }
            Product::deserialize(entry).map_err(|e| ShapeError::BadEntry {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
