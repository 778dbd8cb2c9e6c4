//! Postgres-backed implementations of the `inventory_core` traits.
//!
//! - `repositories`: `PgInventoryRepository`, `PgMovementRepository` (C1)
//! - `services`: `InventoryServiceImpl` (C2), `QueryServiceImpl` (C3)

pub mod repositories;
pub mod services;

pub use repositories::{PgInventoryRepository, PgMovementRepository};
pub use services::{InventoryServiceImpl, QueryServiceImpl};
