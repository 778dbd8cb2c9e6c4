//! Stock-transition endpoints: adjust, reserve, release, commit, transfer,
//! count_adjustment, bulk_adjust (spec.md §4.2, §6.1).

use axum::extract::{Path, Query, State};
use axum::Json;
use validator::Validate;

use inventory_core::dto::inventory_item::{InventoryItemResponse, LocationQuery};
use inventory_core::dto::transition::{
    BulkAdjustRequest, BulkAdjustResponse, BulkAdjustmentResult, CountAdjustmentRequest,
    CountAdjustmentResponse, CreateTransferRequest, QuantityRequest, ReserveResponse,
    TransferResponse, TransitionContext, TransitionResponse,
};
use inventory_core::services::InventoryService;
use shared_error::AppError;

use crate::state::AppState;

pub async fn receive(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Query(location): Query<LocationQuery>,
    Json(request): Json<QuantityRequest>,
) -> Result<Json<TransitionResponse>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let quantity = request.quantity;
    let ctx = TransitionContext::from(request);
    let (item, movement) = state
        .inventory_service
        .receive(&sku, &location.location, quantity, ctx)
        .await?;
    Ok(Json(TransitionResponse {
        data: item.into(),
        movement: movement.into(),
    }))
}

pub async fn adjust(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Query(location): Query<LocationQuery>,
    Json(request): Json<QuantityRequest>,
) -> Result<Json<TransitionResponse>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let quantity = request.quantity;
    let ctx = TransitionContext::from(request);
    let (item, movement) = state
        .inventory_service
        .adjust(&sku, &location.location, quantity, ctx)
        .await?;
    Ok(Json(TransitionResponse {
        data: item.into(),
        movement: movement.into(),
    }))
}

pub async fn reserve(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Query(location): Query<LocationQuery>,
    Json(request): Json<QuantityRequest>,
) -> Result<Json<ReserveResponse>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let quantity = request.quantity;
    let ctx = TransitionContext::from(request);
    let (item, movement, reservation_id) = state
        .inventory_service
        .reserve(&sku, &location.location, quantity, ctx)
        .await?;
    Ok(Json(ReserveResponse {
        data: item.into(),
        movement: movement.into(),
        reservation_id,
    }))
}

pub async fn release(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Query(location): Query<LocationQuery>,
    Json(request): Json<QuantityRequest>,
) -> Result<Json<TransitionResponse>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let quantity = request.quantity;
    let ctx = TransitionContext::from(request);
    let (item, movement) = state
        .inventory_service
        .release(&sku, &location.location, quantity, ctx)
        .await?;
    Ok(Json(TransitionResponse {
        data: item.into(),
        movement: movement.into(),
    }))
}

pub async fn commit(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Query(location): Query<LocationQuery>,
    Json(request): Json<QuantityRequest>,
) -> Result<Json<TransitionResponse>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let quantity = request.quantity;
    let ctx = TransitionContext::from(request);
    let (item, movement) = state
        .inventory_service
        .commit(&sku, &location.location, quantity, ctx)
        .await?;
    Ok(Json(TransitionResponse {
        data: item.into(),
        movement: movement.into(),
    }))
}

pub async fn transfer(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Json(request): Json<CreateTransferRequest>,
) -> Result<Json<TransferResponse>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let ctx = TransitionContext {
        reason: request.reason.clone(),
        reference_type: request.reference_type.clone(),
        reference_id: request.reference_id.clone(),
        metadata: request.metadata.clone(),
    };
    let (source, destination, source_movement, destination_movement, transfer_id) = state
        .inventory_service
        .transfer(
            &sku,
            &request.source_location,
            &request.destination_location,
            request.quantity,
            ctx,
        )
        .await?;
    Ok(Json(TransferResponse {
        source: source.into(),
        destination: destination.into(),
        source_movement: source_movement.into(),
        destination_movement: destination_movement.into(),
        transfer_id,
    }))
}

pub async fn count_adjustment(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Query(location): Query<LocationQuery>,
    Json(request): Json<CountAdjustmentRequest>,
) -> Result<Json<CountAdjustmentResponse>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let (item, movement, difference) = state
        .inventory_service
        .count_adjustment(&sku, &location.location, request.actual)
        .await?;
    Ok(Json(CountAdjustmentResponse {
        data: item.into(),
        movement: movement.map(Into::into),
        difference,
    }))
}

pub async fn bulk_adjust(
    State(state): State<AppState>,
    Json(request): Json<BulkAdjustRequest>,
) -> Result<Json<BulkAdjustResponse>, AppError> {
    let mut results = Vec::with_capacity(request.adjustments.len());
    for line in request.adjustments {
        let ctx = TransitionContext {
            reason: line.reason.clone(),
            reference_type: None,
            reference_id: None,
            metadata: None,
        };
        let result = state
            .inventory_service
            .adjust(&line.sku, &line.location, line.quantity, ctx)
            .await;
        results.push(match result {
            Ok((item, _movement)) => BulkAdjustmentResult {
                sku: line.sku,
                location: line.location,
                success: true,
                item: Some(InventoryItemResponse::from(item)),
                error: None,
            },
            Err(e) => BulkAdjustmentResult {
                sku: line.sku,
                location: line.location,
                success: false,
                item: None,
                error: Some(e.public_message()),
            },
        });
    }
    Ok(Json(BulkAdjustResponse { results }))
}
