//! Read-only query/reporting layer (C3, spec.md §4.3). Composes
//! `InventoryRepository` / `MovementRepository` reads; no locking, no writes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use inventory_core::dto::availability::{AvailabilityReport, CheckAvailabilityRequest, LocationAvailability, SkuAggregate};
use inventory_core::dto::common::{PaginationParams, Paginated};
use inventory_core::dto::inventory_item::InventoryItemListQuery;
use inventory_core::dto::movement::MovementListQuery;
use inventory_core::models::{InventoryItem, StockMovement};
use inventory_core::repositories::{InventoryRepository, MovementRepository};
use inventory_core::services::QueryService;
use shared_error::AppError;

/// A page size large enough to treat a "list everything matching this
/// filter" call as effectively unpaginated, without special-casing the
/// repository query path.
const UNPAGINATED: u32 = 1_000_000;

pub struct QueryServiceImpl {
    inventory_repository: Arc<dyn InventoryRepository>,
    movement_repository: Arc<dyn MovementRepository>,
}

impl QueryServiceImpl {
    pub fn new(
        inventory_repository: Arc<dyn InventoryRepository>,
        movement_repository: Arc<dyn MovementRepository>,
    ) -> Self {
        Self {
            inventory_repository,
            movement_repository,
        }
    }

    fn unpaginated() -> PaginationParams {
        PaginationParams {
            page: 1,
            per_page: UNPAGINATED,
        }
    }

    async fn all_for_sku(&self, sku: &str) -> Result<Vec<InventoryItem>, AppError> {
        let query = InventoryItemListQuery {
            sku: Some(sku.to_string()),
            location: None,
            in_stock: None,
            low_stock: None,
            out_of_stock: None,
            pagination: Self::unpaginated(),
        };
        let (items, _) = self.inventory_repository.list(&query).await?;
        Ok(items)
    }

    fn to_location_availability(item: &InventoryItem) -> LocationAvailability {
        LocationAvailability {
            location: item.location.clone(),
            quantity_on_hand: item.quantity_on_hand,
            quantity_reserved: item.quantity_reserved,
            quantity_available: item.quantity_available(),
            backorderable: item.backorderable,
        }
    }
}

#[async_trait]
impl QueryService for QueryServiceImpl {
    async fn list(&self, query: InventoryItemListQuery) -> Result<Paginated<InventoryItem>, AppError> {
        let pagination = query.pagination.clone();
        let (items, total_count) = self.inventory_repository.list(&query).await?;
        Ok(Paginated {
            data: items,
            meta: pagination.meta(total_count),
        })
    }

    async fn by_sku(&self, sku: &str) -> Result<Vec<InventoryItem>, AppError> {
        self.all_for_sku(sku).await
    }

    async fn low_stock(&self, pagination: PaginationParams) -> Result<Paginated<InventoryItem>, AppError> {
        let query = InventoryItemListQuery {
            sku: None,
            location: None,
            in_stock: None,
            low_stock: Some(true),
            out_of_stock: None,
            pagination,
        };
        self.list(query).await
    }

    async fn in_stock(&self, pagination: PaginationParams) -> Result<Paginated<InventoryItem>, AppError> {
        let query = InventoryItemListQuery {
            sku: None,
            location: None,
            in_stock: Some(true),
            low_stock: None,
            out_of_stock: None,
            pagination,
        };
        self.list(query).await
    }

    async fn out_of_stock(&self, pagination: PaginationParams) -> Result<Paginated<InventoryItem>, AppError> {
        let query = InventoryItemListQuery {
            sku: None,
            location: None,
            in_stock: None,
            low_stock: None,
            out_of_stock: Some(true),
            pagination,
        };
        self.list(query).await
    }

    async fn movements_for(
        &self,
        inventory_item_id: Uuid,
        filter: MovementListQuery,
    ) -> Result<Paginated<StockMovement>, AppError> {
        let pagination = filter.pagination.clone();
        let (movements, total_count) = self
            .movement_repository
            .list_for_item(inventory_item_id, &filter)
            .await?;
        Ok(Paginated {
            data: movements,
            meta: pagination.meta(total_count),
        })
    }

    async fn movement_by_id(&self, id: Uuid) -> Result<StockMovement, AppError> {
        self.movement_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("stock movement {id} not found")))
    }

    async fn list_movements(&self, filter: MovementListQuery) -> Result<Paginated<StockMovement>, AppError> {
        let pagination = filter.pagination.clone();
        let (movements, total_count) = self.movement_repository.list(&filter).await?;
        Ok(Paginated {
            data: movements,
            meta: pagination.meta(total_count),
        })
    }

    async fn check_availability(
        &self,
        sku: &str,
        quantity: i64,
        location: Option<&str>,
    ) -> Result<AvailabilityReport, AppError> {
        let items = self.all_for_sku(sku).await?;
        let matching: Vec<&InventoryItem> = items
            .iter()
            .filter(|item| match location {
                Some(loc) => item.location == loc,
                None => true,
            })
            .collect();

        let total_available: i64 = matching.iter().map(|item| item.quantity_available()).sum();
        let backorderable = matching.iter().any(|item| item.backorderable);
        let is_available = total_available >= quantity || backorderable;

        Ok(AvailabilityReport {
            sku: sku.to_string(),
            requested_quantity: quantity,
            total_available,
            is_available,
            backorderable,
            per_location: matching.into_iter().map(Self::to_location_availability).collect(),
        })
    }

    async fn check_bulk_availability(
        &self,
        requests: Vec<CheckAvailabilityRequest>,
    ) -> Result<Vec<AvailabilityReport>, AppError> {
        let mut reports = Vec::with_capacity(requests.len());
        for request in requests {
            let report = self
                .check_availability(&request.sku, request.quantity, request.location.as_deref())
                .await?;
            reports.push(report);
        }
        Ok(reports)
    }

    async fn aggregate_by_sku(&self) -> Result<Vec<SkuAggregate>, AppError> {
        let query = InventoryItemListQuery {
            sku: None,
            location: None,
            in_stock: None,
            low_stock: None,
            out_of_stock: None,
            pagination: Self::unpaginated(),
        };
        let (items, _) = self.inventory_repository.list(&query).await?;

        let mut totals: HashMap<String, (i64, i64, i64)> = HashMap::new();
        for item in &items {
            let entry = totals.entry(item.sku.clone()).or_insert((0, 0, 0));
            entry.0 += item.quantity_on_hand;
            entry.1 += item.quantity_reserved;
            entry.2 += item.quantity_available();
        }

        let mut aggregates: Vec<SkuAggregate> = totals
            .into_iter()
            .map(|(sku, (on_hand, reserved, available))| SkuAggregate {
                sku,
                total_on_hand: on_hand,
                total_reserved: reserved,
                total_available: available,
            })
            .collect();
        aggregates.sort_by(|a, b| a.sku.cmp(&b.sku));
        Ok(aggregates)
    }

    async fn total_available_for_sku(&self, sku: &str) -> Result<i64, AppError> {
        let items = self.all_for_sku(sku).await?;
        Ok(items.iter().map(|item| item.quantity_available()).sum())
    }

    async fn locations(&self) -> Result<Vec<String>, AppError> {
        self.inventory_repository.locations().await
    }
}
