use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::models::cart::{AddOn, CartItem};
use crate::domain::services::chunking::{read_chunked, write_chunked};
use crate::error::AppError;

/// Provider-imposed cap per metadata value.
pub const METADATA_VALUE_LIMIT: usize = 500;
/// Chunk size kept under the cap so numbered keys never overflow it.
pub const METADATA_CHUNK_SIZE: usize = 490;

const TITLE_LIMIT: usize = 40;
const ADDON_NAME_LIMIT: usize = 20;

pub const DEFAULT_CURRENCY: &str = "eur";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct CompactAddOn {
    #[serde(rename = "i")]
    id: String,
    #[serde(rename = "n")]
    name: String,
    #[serde(rename = "p")]
    price: f64,
}

/// Single-letter projection of a cart item, sized for the metadata value cap.
#[derive(Serialize, Deserialize)]
struct CompactItem {
    #[serde(rename = "i")]
    id: String,
    #[serde(rename = "t")]
    title: String,
    #[serde(rename = "p")]
    price: f64,
    #[serde(rename = "q")]
    quantity: u32,
    #[serde(rename = "k")]
    kind: String,
    #[serde(rename = "d", default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(rename = "h", default, skip_serializing_if = "Option::is_none")]
    time: Option<String>,
    #[serde(rename = "g", default, skip_serializing_if = "Option::is_none")]
    guests: Option<u32>,
    #[serde(rename = "a", default, skip_serializing_if = "Option::is_none")]
    add_ons: Option<Vec<CompactAddOn>>,
}

fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

fn compact(item: &CartItem) -> CompactItem {
    match item {
        CartItem::Product { id, title, price, quantity } => CompactItem {
            id: id.clone(),
            title: truncate(title, TITLE_LIMIT),
            price: *price,
            quantity: *quantity,
            kind: "p".to_string(),
            date: None,
            time: None,
            guests: None,
            add_ons: None,
        },
        CartItem::Experience { id, title, price, quantity, date, time, guests, add_ons } => CompactItem {
            id: id.clone(),
            title: truncate(title, TITLE_LIMIT),
            price: *price,
            quantity: *quantity,
            kind: "e".to_string(),
            date: Some(date.clone()),
            time: Some(time.clone()),
            guests: Some(*guests),
            add_ons: (!add_ons.is_empty()).then(|| {
                add_ons
                    .iter()
                    .map(|a| CompactAddOn {
                        id: a.id.clone(),
                        name: truncate(&a.name, ADDON_NAME_LIMIT),
                        price: a.price,
                    })
                    .collect()
            }),
        },
    }
}

fn expand(item: CompactItem) -> CartItem {
    if item.kind == "e" {
        CartItem::Experience {
            id: item.id,
            title: item.title,
            price: item.price,
            quantity: item.quantity,
            date: item.date.unwrap_or_default(),
            time: item.time.unwrap_or_default(),
            guests: item.guests.unwrap_or(1),
            add_ons: item
                .add_ons
                .unwrap_or_default()
                .into_iter()
                .map(|a| AddOn { id: a.id, name: a.name, price: a.price })
                .collect(),
        }
    } else {
        CartItem::Product {
            id: item.id,
            title: item.title,
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// Serializes the cart and customer context into provider metadata fields. The item
/// array is chunked when it exceeds the value cap; every other field is truncated
/// independently.
pub fn encode_metadata(
    items: &[CartItem],
    customer: &CustomerDetails,
    shipping: Option<&serde_json::Value>,
    special_requests: Option<&str>,
    auth_user_id: Option<&str>,
) -> Result<HashMap<String, String>, AppError> {
    let compact_items: Vec<CompactItem> = items.iter().map(compact).collect();
    let serialized = serde_json::to_string(&compact_items)
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to serialize cart: {}", e)))?;

    let mut metadata = HashMap::new();
    write_chunked(&mut metadata, "items", &serialized, METADATA_VALUE_LIMIT, METADATA_CHUNK_SIZE);

    metadata.insert("customer_name".to_string(), truncate(&customer.name, METADATA_VALUE_LIMIT));
    metadata.insert("customer_email".to_string(), truncate(&customer.email, METADATA_VALUE_LIMIT));
    if let Some(phone) = &customer.phone {
        metadata.insert("customer_phone".to_string(), truncate(phone, METADATA_VALUE_LIMIT));
    }
    if let Some(user_id) = auth_user_id {
        metadata.insert("auth_user_id".to_string(), truncate(user_id, METADATA_VALUE_LIMIT));
    }
    if let Some(shipping) = shipping {
        let raw = serde_json::to_string(shipping)
            .map_err(|e| AppError::InternalWithMsg(format!("Failed to serialize shipping: {}", e)))?;
        metadata.insert("shipping".to_string(), truncate(&raw, METADATA_VALUE_LIMIT));
    }
    if let Some(requests) = special_requests {
        metadata.insert("special_requests".to_string(), truncate(requests, METADATA_VALUE_LIMIT));
    }

    Ok(metadata)
}

#[derive(Debug)]
pub struct DecodedSession {
    pub items: Vec<CartItem>,
    pub customer: CustomerDetails,
    pub shipping: Option<serde_json::Value>,
    pub special_requests: Option<String>,
    pub auth_user_id: Option<String>,
}

/// Test-mode sessions sometimes report `paid` before flipping to `complete`, so
/// either signal counts.
pub fn session_is_complete(status: &str, payment_status: &str) -> bool {
    status == "complete" || payment_status == "paid"
}

pub fn decode_metadata(metadata: &HashMap<String, String>) -> Result<DecodedSession, AppError> {
    let raw_items = read_chunked(metadata, "items")
        .ok_or_else(|| AppError::Payment("Checkout session has no cart metadata".to_string()))?;

    let compact_items: Vec<CompactItem> = serde_json::from_str(&raw_items)
        .map_err(|e| AppError::InternalWithMsg(format!("Corrupt cart metadata: {}", e)))?;
    let items = compact_items.into_iter().map(expand).collect();

    let customer = CustomerDetails {
        name: metadata.get("customer_name").cloned().unwrap_or_default(),
        email: metadata.get("customer_email").cloned().unwrap_or_default(),
        phone: metadata.get("customer_phone").cloned().filter(|p| !p.is_empty()),
    };

    // Shipping may have been truncated mid-JSON; treat anything unparsable as absent.
    let shipping = metadata
        .get("shipping")
        .and_then(|raw| serde_json::from_str(raw).ok());

    Ok(DecodedSession {
        items,
        customer,
        shipping,
        special_requests: metadata.get("special_requests").cloned().filter(|s| !s.is_empty()),
        auth_user_id: metadata.get("auth_user_id").cloned().filter(|s| !s.is_empty()),
    })
}

/// Grand total recomputed from decoded items. This, never the client-declared total,
/// is what gets persisted.
pub fn grand_total(items: &[CartItem]) -> f64 {
    items.iter().map(CartItem::line_total).sum()
}
