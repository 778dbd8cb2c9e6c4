pub mod inventory;
pub mod movement;

pub use inventory::InventoryRepository;
pub use movement::MovementRepository;
