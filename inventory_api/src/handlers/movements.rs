//! Read-only movement ledger browsing (spec.md §6.1).

use axum::extract::{Path, Query, State};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use inventory_core::dto::inventory_item::LocationQuery;
use inventory_core::dto::movement::{MovementListQuery, MovementResponse};
use shared_error::AppError;

use crate::state::AppState;

fn paginated_movements(page: inventory_core::dto::common::Paginated<inventory_core::models::StockMovement>) -> Response {
    let meta = page.meta.clone();
    let mut response = Json(serde_json::json!({
        "data": page.data.into_iter().map(MovementResponse::from).collect::<Vec<_>>(),
        "meta": page.meta,
    }))
    .into_response();
    let headers = response.headers_mut();
    headers.insert("x-total-count", HeaderValue::from(meta.total_count));
    headers.insert("x-page", HeaderValue::from(meta.page));
    headers.insert("x-per-page", HeaderValue::from(meta.per_page));
    response
}

pub async fn movements_for_item(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    Query(location): Query<LocationQuery>,
    Query(filter): Query<MovementListQuery>,
) -> Result<Response, AppError> {
    let item = state.inventory_service.get_item(&sku, &location.location).await?;
    let page = state.query_service.movements_for(item.id, filter).await?;
    Ok(paginated_movements(page))
}

pub async fn list_movements(
    State(state): State<AppState>,
    Query(filter): Query<MovementListQuery>,
) -> Result<Response, AppError> {
    let page = state.query_service.list_movements(filter).await?;
    Ok(paginated_movements(page))
}

pub async fn get_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let movement = state.query_service.movement_by_id(id).await?;
    Ok(Json(serde_json::json!({ "data": MovementResponse::from(movement) })))
}
