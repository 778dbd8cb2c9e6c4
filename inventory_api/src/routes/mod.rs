//! Route definitions and router assembly (spec.md §4.4, §6.1).

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, inventory_items, movements, transitions};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let inventory_routes = Router::new()
        .route("/", get(inventory_items::list_items).post(inventory_items::create_item))
        .route("/low_stock", get(inventory_items::low_stock))
        .route("/locations", get(inventory_items::locations))
        .route("/bulk_adjust", post(transitions::bulk_adjust))
        .route(
            "/{sku}",
            get(inventory_items::get_item)
                .patch(inventory_items::update_item)
                .delete(inventory_items::delete_item),
        )
        .route("/{sku}/receive", post(transitions::receive))
        .route("/{sku}/adjust", post(transitions::adjust))
        .route("/{sku}/reserve", post(transitions::reserve))
        .route("/{sku}/release", post(transitions::release))
        .route("/{sku}/commit", post(transitions::commit))
        .route("/{sku}/transfer", post(transitions::transfer))
        .route("/{sku}/count_adjustment", post(transitions::count_adjustment))
        .route("/{sku}/movements", get(movements::movements_for_item));

    let movement_routes = Router::new()
        .route("/", get(movements::list_movements))
        .route("/{id}", get(movements::get_movement));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1/inventory", inventory_routes)
        .nest("/api/v1/stock_movements", movement_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
