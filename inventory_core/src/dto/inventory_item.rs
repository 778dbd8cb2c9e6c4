//! Request/response DTOs for the inventory item CRUD surface (spec.md §6.1).

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::PaginationParams;
use crate::models::InventoryItem;

fn default_location() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInventoryItemRequest {
    #[validate(length(min = 1, message = "sku must not be empty"))]
    pub sku: String,

    #[serde(default = "default_location")]
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: String,

    pub quantity_on_hand: i64,

    #[validate(range(min = 0, message = "reorder_point must be >= 0"))]
    pub reorder_point: Option<i64>,

    #[validate(range(min = 0, message = "reorder_quantity must be >= 0"))]
    pub reorder_quantity: Option<i64>,

    #[serde(default)]
    pub backorderable: bool,

    pub metadata: Option<Json>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateInventoryItemRequest {
    /// The `lock_version` the caller last read. A stale value is rejected as
    /// `Conflict` rather than silently overwriting a concurrent write
    /// (spec.md §5 "Optimistic vs pessimistic").
    pub lock_version: i64,

    #[validate(range(min = 0, message = "reorder_point must be >= 0"))]
    pub reorder_point: Option<i64>,

    #[validate(range(min = 0, message = "reorder_quantity must be >= 0"))]
    pub reorder_quantity: Option<i64>,

    pub backorderable: Option<bool>,

    pub metadata: Option<Json>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InventoryItemListQuery {
    pub sku: Option<String>,
    pub location: Option<String>,
    pub in_stock: Option<bool>,
    pub low_stock: Option<bool>,
    pub out_of_stock: Option<bool>,

    #[serde(flatten)]
    #[validate(nested)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationQuery {
    #[serde(default = "default_location")]
    pub location: String,
}

impl Default for LocationQuery {
    fn default() -> Self {
        Self {
            location: default_location(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryItemResponse {
    pub id: Uuid,
    pub sku: String,
    pub location: String,
    pub quantity_on_hand: i64,
    pub quantity_reserved: i64,
    pub quantity_available: i64,
    /// `null` means unbounded (backorderable).
    pub available_to_promise: Option<i64>,
    pub reorder_point: Option<i64>,
    pub reorder_quantity: Option<i64>,
    pub backorderable: bool,
    pub metadata: Json,
    pub lock_version: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<InventoryItem> for InventoryItemResponse {
    fn from(item: InventoryItem) -> Self {
        let quantity_available = item.quantity_available();
        let available_to_promise = item.available_to_promise();
        Self {
            id: item.id,
            sku: item.sku,
            location: item.location,
            quantity_on_hand: item.quantity_on_hand,
            quantity_reserved: item.quantity_reserved,
            quantity_available,
            available_to_promise,
            reorder_point: item.reorder_point,
            reorder_quantity: item.reorder_quantity,
            backorderable: item.backorderable,
            metadata: item.metadata,
            lock_version: item.lock_version,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}
