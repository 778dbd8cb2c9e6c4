pub mod engine;
pub mod query;

#[cfg(test)]
mod query_tests;

pub use engine::InventoryServiceImpl;
pub use query::QueryServiceImpl;
