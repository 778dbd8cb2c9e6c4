//! Read-only repository trait for the `StockMovement` ledger (spec.md §4.1,
//! §4.3). Writes happen only as a side effect of a transition, inside
//! `InventoryService` implementations — never through this trait.

use async_trait::async_trait;
use shared_error::AppError;
use uuid::Uuid;

use crate::dto::movement::MovementListQuery;
use crate::models::StockMovement;

#[async_trait]
pub trait MovementRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<StockMovement>, AppError>;

    async fn list_for_item(
        &self,
        inventory_item_id: Uuid,
        filter: &MovementListQuery,
    ) -> Result<(Vec<StockMovement>, i64), AppError>;

    async fn list(
        &self,
        filter: &MovementListQuery,
    ) -> Result<(Vec<StockMovement>, i64), AppError>;
}
