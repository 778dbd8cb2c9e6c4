//! Postgres implementation of the read-only `MovementRepository` (spec.md §4.1).

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

use inventory_core::dto::movement::MovementListQuery;
use inventory_core::models::StockMovement;
use inventory_core::repositories::MovementRepository;
use shared_error::AppError;

const MOVEMENT_COLUMNS: &str = "id, inventory_item_id, movement_type, quantity, \
    quantity_before, quantity_after, reason, reference_type, reference_id, metadata, created_at";

pub struct PgMovementRepository {
    pool: Arc<PgPool>,
}

impl PgMovementRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    fn apply_filter<'a>(builder: &mut QueryBuilder<'a, sqlx::Postgres>, filter: &'a MovementListQuery) {
        if let Some(movement_type) = &filter.movement_type {
            builder.push(" AND movement_type = ").push_bind(movement_type.to_string());
        }
        if let Some(start_date) = filter.start_date {
            builder.push(" AND created_at >= ").push_bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            builder.push(" AND created_at <= ").push_bind(end_date);
        }
        if let Some(reference_type) = &filter.reference_type {
            builder.push(" AND reference_type = ").push_bind(reference_type);
        }
        if let Some(reference_id) = &filter.reference_id {
            builder.push(" AND reference_id = ").push_bind(reference_id);
        }
    }
}

#[async_trait]
impl MovementRepository for PgMovementRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<StockMovement>, AppError> {
        let sql = format!("SELECT {MOVEMENT_COLUMNS} FROM stock_movements WHERE id = $1");
        let movement = sqlx::query_as::<_, StockMovement>(&sql)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(movement)
    }

    async fn list_for_item(
        &self,
        inventory_item_id: Uuid,
        filter: &MovementListQuery,
    ) -> Result<(Vec<StockMovement>, i64), AppError> {
        let mut count_builder =
            QueryBuilder::new("SELECT COUNT(*) FROM stock_movements WHERE inventory_item_id = ");
        count_builder.push_bind(inventory_item_id);
        Self::apply_filter(&mut count_builder, filter);
        let total_count: i64 = count_builder.build_query_scalar().fetch_one(&*self.pool).await?;

        let mut select_builder = QueryBuilder::new(format!(
            "SELECT {MOVEMENT_COLUMNS} FROM stock_movements WHERE inventory_item_id = "
        ));
        select_builder.push_bind(inventory_item_id);
        Self::apply_filter(&mut select_builder, filter);
        select_builder.push(" ORDER BY created_at DESC LIMIT ");
        select_builder.push_bind(filter.pagination.limit());
        select_builder.push(" OFFSET ");
        select_builder.push_bind(filter.pagination.offset());

        let movements = select_builder
            .build_query_as::<StockMovement>()
            .fetch_all(&*self.pool)
            .await?;

        Ok((movements, total_count))
    }

    async fn list(&self, filter: &MovementListQuery) -> Result<(Vec<StockMovement>, i64), AppError> {
        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM stock_movements WHERE 1=1");
        Self::apply_filter(&mut count_builder, filter);
        let total_count: i64 = count_builder.build_query_scalar().fetch_one(&*self.pool).await?;

        let mut select_builder =
            QueryBuilder::new(format!("SELECT {MOVEMENT_COLUMNS} FROM stock_movements WHERE 1=1"));
        Self::apply_filter(&mut select_builder, filter);
        select_builder.push(" ORDER BY created_at DESC LIMIT ");
        select_builder.push_bind(filter.pagination.limit());
        select_builder.push(" OFFSET ");
        select_builder.push_bind(filter.pagination.offset());

        let movements = select_builder
            .build_query_as::<StockMovement>()
            .fetch_all(&*self.pool)
            .await?;

        Ok((movements, total_count))
    }
}
