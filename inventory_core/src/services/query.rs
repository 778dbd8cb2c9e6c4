//! The read-only query/reporting trait (C3, spec.md §4.3).

use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::availability::{AvailabilityReport, CheckAvailabilityRequest, SkuAggregate};
use crate::dto::common::{PaginationParams, Paginated};
use crate::dto::inventory_item::InventoryItemListQuery;
use crate::dto::movement::MovementListQuery;
use crate::models::{InventoryItem, StockMovement};
use shared_error::AppError;

#[async_trait]
pub trait QueryService: Send + Sync {
    async fn list(&self, query: InventoryItemListQuery) -> Result<Paginated<InventoryItem>, AppError>;

    /// All items for an SKU across locations.
    async fn by_sku(&self, sku: &str) -> Result<Vec<InventoryItem>, AppError>;

    /// `available <= reorder_point`, ignoring items with an unset `reorder_point`.
    async fn low_stock(&self, pagination: PaginationParams) -> Result<Paginated<InventoryItem>, AppError>;

    async fn in_stock(&self, pagination: PaginationParams) -> Result<Paginated<InventoryItem>, AppError>;

    async fn out_of_stock(&self, pagination: PaginationParams) -> Result<Paginated<InventoryItem>, AppError>;

    async fn movements_for(
        &self,
        inventory_item_id: Uuid,
        filter: MovementListQuery,
    ) -> Result<Paginated<StockMovement>, AppError>;

    async fn movement_by_id(&self, id: Uuid) -> Result<StockMovement, AppError>;

    async fn list_movements(&self, filter: MovementListQuery) -> Result<Paginated<StockMovement>, AppError>;

    async fn check_availability(
        &self,
        sku: &str,
        quantity: i64,
        location: Option<&str>,
    ) -> Result<AvailabilityReport, AppError>;

    async fn check_bulk_availability(
        &self,
        requests: Vec<CheckAvailabilityRequest>,
    ) -> Result<Vec<AvailabilityReport>, AppError>;

    async fn aggregate_by_sku(&self) -> Result<Vec<SkuAggregate>, AppError>;

    /// Sum of `available` across all locations for an SKU.
    async fn total_available_for_sku(&self, sku: &str) -> Result<i64, AppError>;

    async fn locations(&self) -> Result<Vec<String>, AppError>;
}
