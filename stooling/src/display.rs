//! Product card extraction and human-readable tool call descriptions.

use serde::Serialize;
use serde_json::{Map, Value};

/// A product card for the client to render. Payload shapes vary between
/// storefront backends, so every field is optional and numeric values
/// coerce to strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProductDisplay {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProductDisplay {
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        Some(Self {
            id: string_field(object, "id"),
            title: string_field(object, "title"),
            price: string_field(object, "price"),
            currency: string_field(object, "currency"),
            url: string_field(object, "url"),
            image_url: string_field(object, "image_url"),
        })
    }
}

/// Pulls product cards out of a tool payload's `products` array. Entries
/// that are not objects are dropped rather than failing the whole payload.
pub fn extract_display_items(payload: &Value) -> Vec<ProductDisplay> {
    payload
        .get("products")
        .and_then(Value::as_array)
        .map(|products| {
            products
                .iter()
                .filter_map(ProductDisplay::from_value)
                .collect()
        })
        .unwrap_or_default()
}

/// The human-readable line shown to the customer while a tool runs.
pub fn describe_tool_call(name: &str, input: &Value) -> String {
    let action = name.replace('_', " ");

    if let Some(query) = input.get("query").and_then(Value::as_str) {
        format!("Using {action} for \"{query}\"")
    } else {
        format!("Using {action}")
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
