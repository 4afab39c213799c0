use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::Document;
use crate::error::ApiError;
use crate::types::Collection;

use super::product::Product;
use super::validation::optional_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub items: Vec<OrderItem>,
    pub total: f64,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Document for Order {
    const COLLECTION: Collection = Collection::Orders;
    const LABEL: &'static str = "Order";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Order {
    /// New pending order; the total is always derived from the items
    pub fn new(buyer_id: Uuid, items: Vec<OrderItem>, shipping_address: Option<String>, note: Option<String>) -> Self {
        let total: f64 = items.iter().map(|i| i.unit_price * f64::from(i.quantity)).sum();
        Self {
            id: Uuid::new_v4(),
            buyer_id,
            items,
            total,
            shipping_address,
            note,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Option<Uuid>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Option<Vec<OrderItemRequest>>,
    pub shipping_address: Option<String>,
    pub note: Option<String>,
}

/// An order request whose shape is valid; products still need resolving
#[derive(Debug)]
pub struct OrderDraft {
    pub lines: Vec<(Uuid, u32)>,
    pub shipping_address: Option<String>,
    pub note: Option<String>,
}

impl OrderRequest {
    pub fn validate(self) -> Result<OrderDraft, ApiError> {
        let items = self.items.unwrap_or_default();
        if items.is_empty() {
            return Err(ApiError::validation_error("Order must contain at least one item", None));
        }

        let mut lines: Vec<(Uuid, u32)> = Vec::with_capacity(items.len());
        for item in items {
            let product_id = item
                .product_id
                .ok_or_else(|| ApiError::validation_error("Every item needs a productId", None))?;
            let quantity = match item.quantity {
                Some(q) if q > 0 => q,
                _ => return Err(ApiError::validation_error("Item quantity must be at least 1", None)),
            };
            // Repeated products merge so stock is checked against the full quantity
            match lines.iter_mut().find(|(id, _)| *id == product_id) {
                Some((_, total)) => *total = total.saturating_add(quantity),
                None => lines.push((product_id, quantity)),
            }
        }

        Ok(OrderDraft {
            lines,
            shipping_address: optional_text(self.shipping_address),
            note: optional_text(self.note),
        })
    }
}

/// Price one line against the stored product
pub fn price_line(product: &Product, quantity: u32) -> Result<OrderItem, ApiError> {
    if quantity > product.stock {
        return Err(ApiError::bad_request(format!(
            "Insufficient stock for {}",
            product.name
        )));
    }
    Ok(OrderItem {
        product_id: product.id,
        quantity,
        unit_price: product.price,
    })
}
