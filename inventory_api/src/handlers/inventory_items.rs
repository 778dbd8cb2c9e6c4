//! `/inventory` CRUD and listing handlers (spec.md §6.1).

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use validator::Validate;

use inventory_core::dto::common::{PaginationParams, Paginated};
use inventory_core::dto::inventory_item::{
    CreateInventoryItemRequest, InventoryItemListQuery, InventoryItemResponse, LocationQuery,
    UpdateInventoryItemRequest,
};
use inventory_core::models::InventoryItem;
use shared_error::AppError;

use crate::state::AppState;

fn pagination_headers(meta: &inventory_core::dto::common::PaginationMeta) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-total-count", HeaderValue::from(meta.total_count));
    headers.insert("x-page", HeaderValue::from(meta.page));
    headers.insert("x-per-page", HeaderValue::from(meta.per_page));
    headers
}

fn paginated_response(page: Paginated<InventoryItem>) -> Response {
    let headers = pagination_headers(&page.meta);
    let body = serde_json::json!({
        "data": page.data.into_iter().map(InventoryItemResponse::from).collect::<Vec<_>>(),
        "meta": page.meta,
    });
    (headers, Json(body)).into_response()
}

pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<InventoryItemListQuery>,
) -> Result<Response, AppError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let page = state.query_service.list(query).await?;
    Ok(paginated_response(page))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Query(location): Query<LocationQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = state.inventory_service.get_item(&sku, &location.location).await?;
    Ok(Json(serde_json::json!({ "data": InventoryItemResponse::from(item) })))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<CreateInventoryItemRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let item = state.inventory_service.create_item(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": InventoryItemResponse::from(item) })),
    ))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Query(location): Query<LocationQuery>,
    Json(request): Json<UpdateInventoryItemRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let item = state
        .inventory_service
        .update_item(&sku, &location.location, request)
        .await?;
    Ok(Json(serde_json::json!({ "data": InventoryItemResponse::from(item) })))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Query(location): Query<LocationQuery>,
) -> Result<StatusCode, AppError> {
    state.inventory_service.delete_item(&sku, &location.location).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn low_stock(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, AppError> {
    pagination
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let page = state.query_service.low_stock(pagination).await?;
    Ok(paginated_response(page))
}

pub async fn locations(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let locations = state.query_service.locations().await?;
    Ok(Json(serde_json::json!({ "data": locations })))
}
