//! Repository trait for `InventoryItem` persistence (spec.md §4.1). No
//! implementations here — the Postgres implementation lives in
//! `inventory_infra`.

use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

use crate::dto::inventory_item::{
    CreateInventoryItemRequest, InventoryItemListQuery, UpdateInventoryItemRequest,
};
use crate::models::InventoryItem;

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Enforces uniqueness of `(sku, location)` (spec.md §3.2-1).
    async fn find_by_sku_location(
        &self,
        sku: &str,
        location: &str,
    ) -> Result<Option<InventoryItem>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryItem>, AppError>;

    /// Filtered, paginated listing. Returns the page and the total match count.
    async fn list(
        &self,
        query: &InventoryItemListQuery,
    ) -> Result<(Vec<InventoryItem>, i64), AppError>;

    /// Distinct `location` strings across all items.
    async fn locations(&self) -> Result<Vec<String>, AppError>;

    async fn create(&self, request: &CreateInventoryItemRequest) -> Result<InventoryItem, AppError>;

    /// Updates mutable fields only (`reorder_point`, `reorder_quantity`,
    /// `backorderable`, `metadata`) — never quantities (spec.md §6.1 PATCH).
    /// Rejects a stale `lock_version` as `Conflict` (spec.md §5).
    async fn update_fields(
        &self,
        id: Uuid,
        expected_lock_version: i64,
        request: &UpdateInventoryItemRequest,
    ) -> Result<InventoryItem, AppError>;

    /// Cascade-deletes the item's movements (spec.md §3.2-6).
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}
