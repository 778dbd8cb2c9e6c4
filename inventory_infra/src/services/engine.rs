//! Postgres-backed stock-transition engine (C2, spec.md §4.2).
//!
//! Every transition follows the same shape: begin transaction, lock the
//! target row(s) `FOR UPDATE` in ascending-`id` order, validate, mutate
//! counters, append a movement, commit — then, strictly after commit,
//! publish events through the configured sink. A publish failure is logged
//! and never propagated (spec.md §4.2 "Post-commit hook").

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value as Json};
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use uuid::Uuid;

use inventory_core::dto::inventory_item::{CreateInventoryItemRequest, UpdateInventoryItemRequest};
use inventory_core::dto::transition::TransitionContext;
use inventory_core::models::{InventoryItem, MovementType, StockMovement};
use inventory_core::repositories::InventoryRepository;
use inventory_core::services::InventoryService;
use shared_error::AppError;
use shared_events::{event_types, EventSink, LowStockEvent, StockEvent};

const ITEM_COLUMNS: &str = "id, sku, location, quantity_on_hand, quantity_reserved, \
    reorder_point, reorder_quantity, backorderable, metadata, lock_version, created_at, updated_at";

const MOVEMENT_COLUMNS: &str = "id, inventory_item_id, movement_type, quantity, \
    quantity_before, quantity_after, reason, reference_type, reference_id, metadata, created_at";

pub struct InventoryServiceImpl {
    pool: Arc<PgPool>,
    repository: Arc<dyn InventoryRepository>,
    events: Arc<dyn EventSink>,
}

impl InventoryServiceImpl {
    pub fn new(
        pool: Arc<PgPool>,
        repository: Arc<dyn InventoryRepository>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            pool,
            repository,
            events,
        }
    }

    fn generate_reservation_id() -> String {
        format!("RES-{}", &Uuid::new_v4().simple().to_string()[..16])
    }

    async fn lock_item_by_sku_location(
        tx: &mut Transaction<'_, Postgres>,
        sku: &str,
        location: &str,
    ) -> Result<InventoryItem, AppError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE sku = $1 AND location = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(sku)
            .bind(location)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("inventory item {sku} at {location} not found"))
            })
    }

    async fn lock_item_by_id(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<InventoryItem, AppError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("inventory item {id} not found")))
    }

    async fn apply_counters(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        on_hand: i64,
        reserved: i64,
    ) -> Result<InventoryItem, AppError> {
        let sql = format!(
            "UPDATE inventory_items SET quantity_on_hand = $2, quantity_reserved = $3, \
                lock_version = lock_version + 1, updated_at = now() \
             WHERE id = $1 RETURNING {ITEM_COLUMNS}"
        );
        let item = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(id)
            .bind(on_hand)
            .bind(reserved)
            .fetch_one(&mut **tx)
            .await?;
        Ok(item)
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_movement(
        tx: &mut Transaction<'_, Postgres>,
        inventory_item_id: Uuid,
        movement_type: MovementType,
        quantity: i64,
        quantity_before: i64,
        quantity_after: i64,
        ctx: &TransitionContext,
        extra_metadata: Option<Json>,
    ) -> Result<StockMovement, AppError> {
        let mut metadata = ctx.metadata.clone().unwrap_or_else(|| json!({}));
        if let Some(extra) = extra_metadata {
            if let (Json::Object(base), Json::Object(extra)) = (&mut metadata, extra) {
                base.extend(extra);
            }
        }

        let sql = format!(
            "INSERT INTO stock_movements \
                (inventory_item_id, movement_type, quantity, quantity_before, quantity_after, \
                 reason, reference_type, reference_id, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {MOVEMENT_COLUMNS}"
        );
        let movement = sqlx::query_as::<_, StockMovement>(&sql)
            .bind(inventory_item_id)
            .bind(movement_type.to_string())
            .bind(quantity)
            .bind(quantity_before)
            .bind(quantity_after)
            .bind(&ctx.reason)
            .bind(&ctx.reference_type)
            .bind(&ctx.reference_id)
            .bind(metadata)
            .fetch_one(&mut **tx)
            .await?;
        Ok(movement)
    }

    /// Fires the post-commit movement event, then checks for a reorder
    /// condition and fires a `low_stock` event if warranted. Never returns
    /// an error — all failures are logged by the sink itself.
    async fn publish_post_commit(&self, item: &InventoryItem, movement: &StockMovement) {
        self.events
            .publish_stock_event(StockEvent {
                event_type: Self::movement_event_type(movement.movement_type),
                sku: item.sku.clone(),
                location: item.location.clone(),
                movement_id: movement.id,
                movement_type: movement.movement_type.to_string(),
                quantity: movement.quantity,
            })
            .await;

        if let Some(reorder_point) = item.reorder_point {
            let reorder_quantity = item.reorder_quantity.unwrap_or(0);
            if item.quantity_available() <= reorder_point && reorder_quantity > 0 {
                self.events
                    .publish_low_stock_event(LowStockEvent {
                        event_type: event_types::LOW_STOCK,
                        sku: item.sku.clone(),
                        location: item.location.clone(),
                        available: item.quantity_available(),
                        reorder_point,
                        reorder_quantity,
                    })
                    .await;
            }
        }
    }

    fn movement_event_type(movement_type: MovementType) -> &'static str {
        match movement_type {
            MovementType::Receipt => event_types::RECEIPT,
            MovementType::Sale => event_types::SALE,
            MovementType::Adjustment => event_types::ADJUSTMENT,
            MovementType::TransferIn => event_types::TRANSFER_IN,
            MovementType::TransferOut => event_types::TRANSFER_OUT,
            MovementType::Reservation => event_types::RESERVATION,
            MovementType::Release => event_types::RELEASE,
            MovementType::Commit => event_types::COMMIT,
            MovementType::Return => event_types::RETURN,
            MovementType::Damage => event_types::DAMAGE,
            MovementType::Loss => event_types::LOSS,
            MovementType::Found => event_types::FOUND,
            MovementType::CountAdjustment => event_types::COUNT_ADJUSTMENT,
        }
    }
}

#[async_trait]
impl InventoryService for InventoryServiceImpl {
    async fn create_item(&self, request: CreateInventoryItemRequest) -> Result<InventoryItem, AppError> {
        self.repository.create(&request).await
    }

    async fn get_item(&self, sku: &str, location: &str) -> Result<InventoryItem, AppError> {
        self.repository
            .find_by_sku_location(sku, location)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("inventory item {sku} at {location} not found")))
    }

    async fn update_item(
        &self,
        sku: &str,
        location: &str,
        request: UpdateInventoryItemRequest,
    ) -> Result<InventoryItem, AppError> {
        let existing = self.get_item(sku, location).await?;
        self.repository
            .update_fields(existing.id, request.lock_version, &request)
            .await
    }

    async fn delete_item(&self, sku: &str, location: &str) -> Result<(), AppError> {
        let existing = self.get_item(sku, location).await?;
        self.repository.delete(existing.id).await
    }

    async fn receive(
        &self,
        sku: &str,
        location: &str,
        quantity: i64,
        ctx: TransitionContext,
    ) -> Result<(InventoryItem, StockMovement), AppError> {
        if quantity <= 0 {
            return Err(AppError::BadInput("quantity must be > 0 for receive".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        let item = Self::lock_item_by_sku_location(&mut tx, sku, location).await?;

        let before = item.quantity_on_hand;
        let after = before + quantity;
        let updated = Self::apply_counters(&mut tx, item.id, after, item.quantity_reserved).await?;
        let movement = Self::insert_movement(
            &mut tx,
            item.id,
            MovementType::Receipt,
            quantity,
            before,
            after,
            &ctx,
            None,
        )
        .await?;
        tx.commit().await?;

        self.publish_post_commit(&updated, &movement).await;
        Ok((updated, movement))
    }

    async fn adjust(
        &self,
        sku: &str,
        location: &str,
        quantity: i64,
        ctx: TransitionContext,
    ) -> Result<(InventoryItem, StockMovement), AppError> {
        let mut tx = self.pool.begin().await?;
        let item = Self::lock_item_by_sku_location(&mut tx, sku, location).await?;

        let before = item.quantity_on_hand;
        let after = before + quantity;
        if quantity < 0 && !item.backorderable && after < item.quantity_reserved {
            return Err(AppError::InsufficientStock(format!(
                "adjusting {sku} at {location} by {quantity} would leave on_hand below reserved"
            )));
        }

        let updated = Self::apply_counters(&mut tx, item.id, after, item.quantity_reserved).await?;
        let movement = Self::insert_movement(
            &mut tx,
            item.id,
            MovementType::Adjustment,
            quantity,
            before,
            after,
            &ctx,
            None,
        )
        .await?;
        tx.commit().await?;

        self.publish_post_commit(&updated, &movement).await;
        Ok((updated, movement))
    }

    async fn reserve(
        &self,
        sku: &str,
        location: &str,
        quantity: i64,
        ctx: TransitionContext,
    ) -> Result<(InventoryItem, StockMovement, String), AppError> {
        if quantity <= 0 {
            return Err(AppError::BadInput("quantity must be > 0 for reserve".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        let item = Self::lock_item_by_sku_location(&mut tx, sku, location).await?;

        if !item.can_reserve(quantity) {
            return Err(AppError::InsufficientStock(format!(
                "cannot reserve {quantity} of {sku} at {location}: only {} available",
                item.quantity_available()
            )));
        }

        let reservation_id = Self::generate_reservation_id();
        let before = item.quantity_on_hand;
        let new_reserved = item.quantity_reserved + quantity;
        let updated = Self::apply_counters(&mut tx, item.id, item.quantity_on_hand, new_reserved).await?;
        let movement = Self::insert_movement(
            &mut tx,
            item.id,
            MovementType::Reservation,
            -quantity,
            before,
            before,
            &ctx,
            Some(json!({ "reservation_id": reservation_id })),
        )
        .await?;
        tx.commit().await?;

        self.publish_post_commit(&updated, &movement).await;
        Ok((updated, movement, reservation_id))
    }

    async fn release(
        &self,
        sku: &str,
        location: &str,
        quantity: i64,
        ctx: TransitionContext,
    ) -> Result<(InventoryItem, StockMovement), AppError> {
        let mut tx = self.pool.begin().await?;
        let item = Self::lock_item_by_sku_location(&mut tx, sku, location).await?;

        if quantity <= 0 || quantity > item.quantity_reserved {
            return Err(AppError::InsufficientReservation(format!(
                "cannot release {quantity} of {sku} at {location}: only {} reserved",
                item.quantity_reserved
            )));
        }

        let before = item.quantity_on_hand;
        let new_reserved = item.quantity_reserved - quantity;
        let updated = Self::apply_counters(&mut tx, item.id, item.quantity_on_hand, new_reserved).await?;
        let movement = Self::insert_movement(
            &mut tx,
            item.id,
            MovementType::Release,
            quantity,
            before,
            before,
            &ctx,
            None,
        )
        .await?;
        tx.commit().await?;

        self.publish_post_commit(&updated, &movement).await;
        Ok((updated, movement))
    }

    async fn commit(
        &self,
        sku: &str,
        location: &str,
        quantity: i64,
        ctx: TransitionContext,
    ) -> Result<(InventoryItem, StockMovement), AppError> {
        let mut tx = self.pool.begin().await?;
        let item = Self::lock_item_by_sku_location(&mut tx, sku, location).await?;

        if quantity <= 0 || quantity > item.quantity_reserved {
            return Err(AppError::InsufficientReservation(format!(
                "cannot commit {quantity} of {sku} at {location}: only {} reserved",
                item.quantity_reserved
            )));
        }

        let before = item.quantity_on_hand;
        let after = before - quantity;
        let new_reserved = item.quantity_reserved - quantity;
        let updated = Self::apply_counters(&mut tx, item.id, after, new_reserved).await?;
        let movement = Self::insert_movement(
            &mut tx,
            item.id,
            MovementType::Commit,
            -quantity,
            before,
            after,
            &ctx,
            None,
        )
        .await?;
        tx.commit().await?;

        self.publish_post_commit(&updated, &movement).await;
        Ok((updated, movement))
    }

    async fn transfer(
        &self,
        sku: &str,
        source_location: &str,
        destination_location: &str,
        quantity: i64,
        ctx: TransitionContext,
    ) -> Result<(InventoryItem, InventoryItem, StockMovement, StockMovement, Uuid), AppError> {
        if source_location == destination_location {
            return Err(AppError::BadInput(
                "source_location and destination_location must differ".to_string(),
            ));
        }
        if quantity <= 0 {
            return Err(AppError::BadInput("quantity must be > 0 for transfer".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let source_id = {
            let source = Self::lock_item_by_sku_location(&mut tx, sku, source_location).await?;
            source.id
        };
        let dest_id = {
            let dest = Self::lock_item_by_sku_location(&mut tx, sku, destination_location).await?;
            dest.id
        };

        let (source, destination) = if source_id < dest_id {
            let source = Self::lock_item_by_id(&mut tx, source_id).await?;
            let destination = Self::lock_item_by_id(&mut tx, dest_id).await?;
            (source, destination)
        } else {
            let destination = Self::lock_item_by_id(&mut tx, dest_id).await?;
            let source = Self::lock_item_by_id(&mut tx, source_id).await?;
            (source, destination)
        };

        if !source.can_fulfill(quantity) {
            return Err(AppError::InsufficientStock(format!(
                "cannot transfer {quantity} of {sku} from {source_location}: only {} available",
                source.quantity_available()
            )));
        }

        let transfer_id = Uuid::new_v4();
        let source_before = source.quantity_on_hand;
        let source_after = source_before - quantity;
        let dest_before = destination.quantity_on_hand;
        let dest_after = dest_before + quantity;

        let updated_source =
            Self::apply_counters(&mut tx, source.id, source_after, source.quantity_reserved).await?;
        let updated_destination =
            Self::apply_counters(&mut tx, destination.id, dest_after, destination.quantity_reserved).await?;

        let source_movement = Self::insert_movement(
            &mut tx,
            source.id,
            MovementType::TransferOut,
            -quantity,
            source_before,
            source_after,
            &ctx,
            Some(json!({
                "transfer_id": transfer_id,
                "source_location": source_location,
                "destination_location": destination_location,
            })),
        )
        .await?;
        let destination_movement = Self::insert_movement(
            &mut tx,
            destination.id,
            MovementType::TransferIn,
            quantity,
            dest_before,
            dest_after,
            &ctx,
            Some(json!({
                "transfer_id": transfer_id,
                "source_location": source_location,
                "destination_location": destination_location,
            })),
        )
        .await?;

        tx.commit().await?;

        self.publish_post_commit(&updated_source, &source_movement).await;
        self.publish_post_commit(&updated_destination, &destination_movement).await;

        Ok((
            updated_source,
            updated_destination,
            source_movement,
            destination_movement,
            transfer_id,
        ))
    }

    async fn count_adjustment(
        &self,
        sku: &str,
        location: &str,
        actual: i64,
    ) -> Result<(InventoryItem, Option<StockMovement>, i64), AppError> {
        if actual < 0 {
            return Err(AppError::BadInput("actual must be >= 0".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        let item = Self::lock_item_by_sku_location(&mut tx, sku, location).await?;

        if actual < item.quantity_reserved && !item.backorderable {
            return Err(AppError::InsufficientStock(format!(
                "counted quantity {actual} for {sku} at {location} is below the {} units reserved",
                item.quantity_reserved
            )));
        }

        let prior = item.quantity_on_hand;
        let difference = actual - prior;

        if difference == 0 {
            tx.commit().await?;
            return Ok((item, None, 0));
        }

        let updated = Self::apply_counters(&mut tx, item.id, actual, item.quantity_reserved).await?;
        let ctx = TransitionContext {
            reason: Some("physical count".to_string()),
            reference_type: None,
            reference_id: None,
            metadata: None,
        };
        let movement = Self::insert_movement(
            &mut tx,
            item.id,
            MovementType::CountAdjustment,
            difference,
            prior,
            actual,
            &ctx,
            Some(json!({
                "expected": prior,
                "actual": actual,
                "counted_at": Utc::now(),
            })),
        )
        .await?;
        tx.commit().await?;

        self.publish_post_commit(&updated, &movement).await;
        Ok((updated, Some(movement), difference))
    }
}
