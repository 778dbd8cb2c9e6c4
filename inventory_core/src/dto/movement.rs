//! DTOs for the immutable movement ledger (spec.md §3.1, §4.3, §6.1).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::PaginationParams;
use crate::models::{MovementType, StockMovement};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MovementListQuery {
    #[serde(rename = "type")]
    pub movement_type: Option<MovementType>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,

    #[serde(flatten)]
    #[validate(nested)]
    pub pagination: PaginationParams,
}

impl Default for MovementListQuery {
    fn default() -> Self {
        Self {
            movement_type: None,
            start_date: None,
            end_date: None,
            reference_type: None,
            reference_id: None,
            pagination: PaginationParams::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MovementResponse {
    pub id: Uuid,
    pub inventory_item_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub quantity_before: i64,
    pub quantity_after: i64,
    pub reason: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    pub metadata: Json,
    pub created_at: DateTime<Utc>,
}

impl From<StockMovement> for MovementResponse {
    fn from(m: StockMovement) -> Self {
        Self {
            id: m.id,
            inventory_item_id: m.inventory_item_id,
            movement_type: m.movement_type,
            quantity: m.quantity,
            quantity_before: m.quantity_before,
            quantity_after: m.quantity_after,
            reason: m.reason,
            reference_type: m.reference_type,
            reference_id: m.reference_id,
            metadata: m.metadata,
            created_at: m.created_at,
        }
    }
}
