//! Request/response DTOs for the stock-transition operations (spec.md §4.2,
//! §6.1, §6.2).

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use validator::Validate;

use crate::dto::inventory_item::InventoryItemResponse;
use crate::dto::movement::MovementResponse;

fn default_location() -> String {
    "default".to_string()
}

/// Audit context threaded through every transition (reason + polymorphic
/// reference hint + free-form metadata). Kept separate from the raw quantity
/// so engine method signatures stay readable (spec.md §4.2, §9 "Polymorphic
/// reference").
#[derive(Debug, Clone, Default)]
pub struct TransitionContext {
    pub reason: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    pub metadata: Option<Json>,
}

impl From<QuantityRequest> for TransitionContext {
    fn from(req: QuantityRequest) -> Self {
        Self {
            reason: req.reason,
            reference_type: req.reference_type,
            reference_id: req.reference_id,
            metadata: req.metadata,
        }
    }
}

/// Shared shape for `receive`/`adjust`/`reserve`/`release`/`commit`: a signed
/// or unsigned quantity plus free-form audit context.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuantityRequest {
    pub quantity: i64,
    pub reason: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    pub metadata: Option<Json>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTransferRequest {
    #[serde(default = "default_location")]
    pub source_location: String,
    pub destination_location: String,
    pub quantity: i64,
    pub reason: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    pub metadata: Option<Json>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CountAdjustmentRequest {
    #[validate(range(min = 0, message = "actual must be >= 0"))]
    pub actual: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkAdjustmentLine {
    pub sku: String,
    #[serde(default = "default_location")]
    pub location: String,
    pub quantity: i64,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkAdjustRequest {
    pub adjustments: Vec<BulkAdjustmentLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkAdjustmentResult {
    pub sku: String,
    pub location: String,
    pub success: bool,
    pub item: Option<InventoryItemResponse>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkAdjustResponse {
    pub results: Vec<BulkAdjustmentResult>,
}

/// Common envelope for a single-item mutating endpoint: the hydrated item
/// plus the one (or two, for transfer) movement(s) it produced.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionResponse {
    pub data: InventoryItemResponse,
    pub movement: MovementResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReserveResponse {
    pub data: InventoryItemResponse,
    pub movement: MovementResponse,
    pub reservation_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferResponse {
    pub source: InventoryItemResponse,
    pub destination: InventoryItemResponse,
    pub source_movement: MovementResponse,
    pub destination_movement: MovementResponse,
    pub transfer_id: uuid::Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountAdjustmentResponse {
    pub data: InventoryItemResponse,
    pub movement: Option<MovementResponse>,
    pub difference: i64,
}
