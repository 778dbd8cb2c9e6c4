//! Postgres implementation of `InventoryRepository` (spec.md §4.1).

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

use inventory_core::dto::inventory_item::{
    CreateInventoryItemRequest, InventoryItemListQuery, UpdateInventoryItemRequest,
};
use inventory_core::models::InventoryItem;
use inventory_core::repositories::InventoryRepository;
use shared_error::AppError;

const ITEM_COLUMNS: &str = "id, sku, location, quantity_on_hand, quantity_reserved, \
    reorder_point, reorder_quantity, backorderable, metadata, lock_version, created_at, updated_at";

pub struct PgInventoryRepository {
    pool: Arc<PgPool>,
}

impl PgInventoryRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryRepository for PgInventoryRepository {
    async fn find_by_sku_location(
        &self,
        sku: &str,
        location: &str,
    ) -> Result<Option<InventoryItem>, AppError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE sku = $1 AND location = $2"
        );
        let item = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(sku)
            .bind(location)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(item)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryItem>, AppError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = $1");
        let item = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(item)
    }

    async fn list(
        &self,
        query: &InventoryItemListQuery,
    ) -> Result<(Vec<InventoryItem>, i64), AppError> {
        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM inventory_items WHERE 1=1");
        let mut select_builder =
            QueryBuilder::new(format!("SELECT {ITEM_COLUMNS} FROM inventory_items WHERE 1=1"));

        for builder in [&mut count_builder, &mut select_builder] {
            if let Some(sku) = &query.sku {
                builder.push(" AND sku = ").push_bind(sku.clone());
            }
            if let Some(location) = &query.location {
                builder.push(" AND location = ").push_bind(location.clone());
            }
            if query.in_stock == Some(true) {
                builder.push(" AND (quantity_on_hand - quantity_reserved) > 0");
            }
            if query.out_of_stock == Some(true) {
                builder.push(" AND (quantity_on_hand - quantity_reserved) <= 0");
            }
            if query.low_stock == Some(true) {
                builder.push(
                    " AND reorder_point IS NOT NULL AND (quantity_on_hand - quantity_reserved) <= reorder_point",
                );
            }
        }

        let total_count: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&*self.pool)
            .await?;

        select_builder.push(" ORDER BY sku, location LIMIT ");
        select_builder.push_bind(query.pagination.limit());
        select_builder.push(" OFFSET ");
        select_builder.push_bind(query.pagination.offset());

        let items = select_builder
            .build_query_as::<InventoryItem>()
            .fetch_all(&*self.pool)
            .await?;

        Ok((items, total_count))
    }

    async fn locations(&self) -> Result<Vec<String>, AppError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT location FROM inventory_items ORDER BY location")
                .fetch_all(&*self.pool)
                .await?;
        Ok(rows.into_iter().map(|(location,)| location).collect())
    }

    async fn create(&self, request: &CreateInventoryItemRequest) -> Result<InventoryItem, AppError> {
        if request.quantity_on_hand < 0 {
            return Err(AppError::BadInput(
                "quantity_on_hand must be >= 0".to_string(),
            ));
        }

        let sql = format!(
            "INSERT INTO inventory_items \
                (sku, location, quantity_on_hand, reorder_point, reorder_quantity, backorderable, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ITEM_COLUMNS}"
        );
        let item = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(&request.sku)
            .bind(&request.location)
            .bind(request.quantity_on_hand)
            .bind(request.reorder_point)
            .bind(request.reorder_quantity)
            .bind(request.backorderable)
            .bind(request.metadata.clone().unwrap_or_else(|| serde_json::json!({})))
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AppError::Conflict(format!(
                        "inventory item already exists for sku={} location={}",
                        request.sku, request.location
                    ))
                },
                _ => AppError::from(e),
            })?;
        Ok(item)
    }

    async fn update_fields(
        &self,
        id: Uuid,
        expected_lock_version: i64,
        request: &UpdateInventoryItemRequest,
    ) -> Result<InventoryItem, AppError> {
        let sql = format!(
            "UPDATE inventory_items SET \
                reorder_point = COALESCE($3, reorder_point), \
                reorder_quantity = COALESCE($4, reorder_quantity), \
                backorderable = COALESCE($5, backorderable), \
                metadata = COALESCE($6, metadata), \
                lock_version = lock_version + 1, \
                updated_at = now() \
             WHERE id = $1 AND lock_version = $2 \
             RETURNING {ITEM_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(id)
            .bind(expected_lock_version)
            .bind(request.reorder_point)
            .bind(request.reorder_quantity)
            .bind(request.backorderable)
            .bind(request.metadata.clone())
            .fetch_optional(&*self.pool)
            .await?;

        match updated {
            Some(item) => Ok(item),
            None => match self.find_by_id(id).await? {
                Some(_) => Err(AppError::Conflict(
                    "inventory item was modified concurrently".to_string(),
                )),
                None => Err(AppError::NotFound(format!("inventory item {id} not found"))),
            },
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id)
            .execute(&*self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("inventory item {id} not found")));
        }
        Ok(())
    }
}
