//! Inventory Service Core
//!
//! Business logic, domain models, and trait definitions for the inventory
//! service. Zero infrastructure dependencies beyond the `sqlx::Type` derives
//! needed to round-trip `MovementType` through Postgres.
//!
//! ## Architecture
//!
//! - `models`: `InventoryItem` / `StockMovement` domain entities
//! - `dto`: request/response shapes for the REST and RPC adapters
//! - `repositories`: persistence trait definitions (no implementations)
//! - `services`: the transition engine (C2) and query (C3) trait definitions

pub mod dto;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{InventoryItem, MovementType, StockMovement};
pub use repositories::{InventoryRepository, MovementRepository};
pub use services::{InventoryService, QueryService};
pub use shared_error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
