//! Typed request/response RPC adapter (C5, spec.md §4.5, §6.2).

pub mod proto {
    tonic::include_proto!("inventory.v1");
}

mod service;

pub use service::InventoryGrpcService;
