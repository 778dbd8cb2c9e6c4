pub mod inventory;
pub mod movement;

pub use inventory::PgInventoryRepository;
pub use movement::PgMovementRepository;
