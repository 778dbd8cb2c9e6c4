//! The stock-transition engine trait (C2, spec.md §4.2).
//!
//! Every transition shares one shape: begin transaction, lock the target
//! row(s) in ascending-`id` order, validate, mutate counters, append a
//! movement, commit. Implementations live in `inventory_infra`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::dto::inventory_item::{
    CreateInventoryItemRequest, UpdateInventoryItemRequest,
};
use crate::dto::transition::TransitionContext;
use crate::models::{InventoryItem, StockMovement};
use shared_error::AppError;

#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn create_item(&self, request: CreateInventoryItemRequest) -> Result<InventoryItem, AppError>;

    async fn get_item(&self, sku: &str, location: &str) -> Result<InventoryItem, AppError>;

    async fn update_item(
        &self,
        sku: &str,
        location: &str,
        request: UpdateInventoryItemRequest,
    ) -> Result<InventoryItem, AppError>;

    async fn delete_item(&self, sku: &str, location: &str) -> Result<(), AppError>;

    /// `on_hand += q` (`q > 0`). Emits one `receipt` movement.
    async fn receive(
        &self,
        sku: &str,
        location: &str,
        quantity: i64,
        ctx: TransitionContext,
    ) -> Result<(InventoryItem, StockMovement), AppError>;

    /// `on_hand += q` (`q` signed). Emits one `adjustment` movement.
    async fn adjust(
        &self,
        sku: &str,
        location: &str,
        quantity: i64,
        ctx: TransitionContext,
    ) -> Result<(InventoryItem, StockMovement), AppError>;

    /// `reserved += q` (`q > 0`). Returns the opaque `RES-`-prefixed audit
    /// handle alongside the item and movement (spec.md §4.2 `reserve`).
    async fn reserve(
        &self,
        sku: &str,
        location: &str,
        quantity: i64,
        ctx: TransitionContext,
    ) -> Result<(InventoryItem, StockMovement, String), AppError>;

    /// `reserved -= q` (`0 < q <= reserved`). Emits one `release` movement.
    async fn release(
        &self,
        sku: &str,
        location: &str,
        quantity: i64,
        ctx: TransitionContext,
    ) -> Result<(InventoryItem, StockMovement), AppError>;

    /// `on_hand -= q` and `reserved -= q` (`0 < q <= reserved`). Emits one
    /// `commit` movement.
    async fn commit(
        &self,
        sku: &str,
        location: &str,
        quantity: i64,
        ctx: TransitionContext,
    ) -> Result<(InventoryItem, StockMovement), AppError>;

    /// Moves `q` on-hand units from `source_location` to `destination_location`
    /// for the same SKU. Locks both rows in ascending-`id` order to preclude
    /// deadlock (spec.md §4.2 `transfer`, §5). Returns both items, both
    /// movements (sharing a `transfer_id` in metadata), and that `transfer_id`.
    async fn transfer(
        &self,
        sku: &str,
        source_location: &str,
        destination_location: &str,
        quantity: i64,
        ctx: TransitionContext,
    ) -> Result<(InventoryItem, InventoryItem, StockMovement, StockMovement, Uuid), AppError>;

    /// Reconciles `on_hand` to a physically counted `actual`. Emits no
    /// movement when `actual == prior` (spec.md §4.2 `count_adjustment`).
    async fn count_adjustment(
        &self,
        sku: &str,
        location: &str,
        actual: i64,
    ) -> Result<(InventoryItem, Option<StockMovement>, i64), AppError>;
}
