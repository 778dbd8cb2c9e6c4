//! Shared application state handed to every handler and the RPC service.

use std::sync::Arc;

use inventory_core::services::{InventoryService, QueryService};

#[derive(Clone)]
pub struct AppState {
    pub inventory_service: Arc<dyn InventoryService>,
    pub query_service: Arc<dyn QueryService>,
    pub pool: sqlx::PgPool,
}
