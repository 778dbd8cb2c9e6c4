//! HTTP (REST) and gRPC adapters over the inventory engine and query
//! services (C4/C5, spec.md §4.4, §4.5).

pub mod handlers;
pub mod routes;
pub mod rpc;
pub mod state;

pub use routes::create_router;
pub use state::AppState;

/// Builds the REST router directly from a pool and event sink, wiring the
/// same repository/service stack `main` does. Exists so integration tests
/// can stand up a full app without a running binary.
pub fn create_app(
    pool: sqlx::PgPool,
    events: std::sync::Arc<dyn shared_events::EventSink>,
) -> axum::Router {
    use std::sync::Arc;

    use inventory_infra::{
        InventoryServiceImpl, PgInventoryRepository, PgMovementRepository, QueryServiceImpl,
    };

    let pool = Arc::new(pool);
    let inventory_repository = Arc::new(PgInventoryRepository::new(pool.clone()));
    let movement_repository = Arc::new(PgMovementRepository::new(pool.clone()));

    let inventory_service = Arc::new(InventoryServiceImpl::new(
        pool.clone(),
        inventory_repository.clone(),
        events,
    ));
    let query_service = Arc::new(QueryServiceImpl::new(inventory_repository, movement_repository));

    let state = AppState {
        inventory_service,
        query_service,
        pool: (*pool).clone(),
    };

    create_router(state)
}
