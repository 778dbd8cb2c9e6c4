//! Unit tests for `QueryServiceImpl` using mocked repositories.

use async_trait::async_trait;
use mockall::mock;
use std::sync::Arc;
use uuid::Uuid;

use inventory_core::dto::inventory_item::{
    CreateInventoryItemRequest, InventoryItemListQuery, UpdateInventoryItemRequest,
};
use inventory_core::dto::movement::MovementListQuery;
use inventory_core::models::{InventoryItem, StockMovement};
use inventory_core::repositories::{InventoryRepository, MovementRepository};
use inventory_core::services::QueryService;
use inventory_core::AppError;

use super::QueryServiceImpl;

mock! {
    pub Inventory {}

    #[async_trait]
    impl InventoryRepository for Inventory {
        async fn find_by_sku_location(&self, sku: &str, location: &str) -> Result<Option<InventoryItem>, AppError>;
        async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryItem>, AppError>;
        async fn list(&self, query: &InventoryItemListQuery) -> Result<(Vec<InventoryItem>, i64), AppError>;
        async fn locations(&self) -> Result<Vec<String>, AppError>;
        async fn create(&self, request: &CreateInventoryItemRequest) -> Result<InventoryItem, AppError>;
        async fn update_fields(&self, id: Uuid, expected_lock_version: i64, request: &UpdateInventoryItemRequest) -> Result<InventoryItem, AppError>;
        async fn delete(&self, id: Uuid) -> Result<(), AppError>;
    }
}

mock! {
    pub Movement {}

    #[async_trait]
    impl MovementRepository for Movement {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<StockMovement>, AppError>;
        async fn list_for_item(&self, inventory_item_id: Uuid, filter: &MovementListQuery) -> Result<(Vec<StockMovement>, i64), AppError>;
        async fn list(&self, filter: &MovementListQuery) -> Result<(Vec<StockMovement>, i64), AppError>;
    }
}

fn item(sku: &str, location: &str, on_hand: i64, reserved: i64, backorderable: bool) -> InventoryItem {
    InventoryItem {
        id: Uuid::new_v4(),
        sku: sku.to_string(),
        location: location.to_string(),
        quantity_on_hand: on_hand,
        quantity_reserved: reserved,
        reorder_point: None,
        reorder_quantity: None,
        backorderable,
        metadata: serde_json::json!({}),
        lock_version: 0,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

#[tokio::test]
async fn check_availability_sums_across_matching_locations() {
    let mut inventory_repo = MockInventory::new();
    inventory_repo.expect_list().returning(|_| {
        Ok((
            vec![
                item("WIDGET-1", "east", 10, 2, false),
                item("WIDGET-1", "west", 5, 0, false),
            ],
            2,
        ))
    });
    let movement_repo = MockMovement::new();

    let service = QueryServiceImpl::new(Arc::new(inventory_repo), Arc::new(movement_repo));

    let report = service.check_availability("WIDGET-1", 12, None).await.unwrap();
    assert_eq!(report.total_available, 13);
    assert!(report.is_available);
    assert_eq!(report.per_location.len(), 2);
}

#[tokio::test]
async fn check_availability_is_satisfied_when_any_location_is_backorderable() {
    let mut inventory_repo = MockInventory::new();
    inventory_repo
        .expect_list()
        .returning(|_| Ok((vec![item("WIDGET-2", "default", 0, 0, true)], 1)));
    let movement_repo = MockMovement::new();

    let service = QueryServiceImpl::new(Arc::new(inventory_repo), Arc::new(movement_repo));

    let report = service.check_availability("WIDGET-2", 1000, None).await.unwrap();
    assert!(report.is_available);
    assert!(report.backorderable);
}

#[tokio::test]
async fn aggregate_by_sku_groups_quantities_across_locations() {
    let mut inventory_repo = MockInventory::new();
    inventory_repo.expect_list().returning(|_| {
        Ok((
            vec![
                item("WIDGET-3", "east", 10, 1, false),
                item("WIDGET-3", "west", 4, 0, false),
                item("WIDGET-4", "east", 7, 2, false),
            ],
            3,
        ))
    });
    let movement_repo = MockMovement::new();

    let service = QueryServiceImpl::new(Arc::new(inventory_repo), Arc::new(movement_repo));
    let aggregates = service.aggregate_by_sku().await.unwrap();

    let widget3 = aggregates.iter().find(|a| a.sku == "WIDGET-3").unwrap();
    assert_eq!(widget3.total_on_hand, 14);
    assert_eq!(widget3.total_reserved, 1);
    assert_eq!(widget3.total_available, 13);
}

#[tokio::test]
async fn movement_by_id_maps_missing_row_to_not_found() {
    let inventory_repo = MockInventory::new();
    let mut movement_repo = MockMovement::new();
    movement_repo.expect_find_by_id().returning(|_| Ok(None));

    let service = QueryServiceImpl::new(Arc::new(inventory_repo), Arc::new(movement_repo));
    let result = service.movement_by_id(Uuid::new_v4()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}
