//! The post-commit event hook (spec.md §4.2 "Post-commit hook" and "Reorder
//! detection").
//!
//! The engine is correct without a sink: publication happens strictly after a
//! transition's transaction has committed, and a publish failure is logged,
//! never propagated back to the caller. `LoggingEventSink` is the default;
//! `NatsEventSink` (behind the `nats` feature) is a drop-in replacement for
//! routing to a real bus without touching the transition code.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct StockEvent {
    pub event_type: &'static str,
    pub sku: String,
    pub location: String,
    pub movement_id: Uuid,
    pub movement_type: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LowStockEvent {
    pub event_type: &'static str,
    pub sku: String,
    pub location: String,
    pub available: i64,
    pub reorder_point: i64,
    pub reorder_quantity: i64,
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish_stock_event(&self, event: StockEvent);
    async fn publish_low_stock_event(&self, event: LowStockEvent);
}

/// Default sink: structured JSON through `tracing`.
pub struct LoggingEventSink;

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn publish_stock_event(&self, event: StockEvent) {
        tracing::info!(
            target: "inventory.events",
            event = %serde_json::to_string(&event).unwrap_or_default(),
            "stock event"
        );
    }

    async fn publish_low_stock_event(&self, event: LowStockEvent) {
        tracing::warn!(
            target: "inventory.events",
            event = %serde_json::to_string(&event).unwrap_or_default(),
            "low stock event"
        );
    }
}

#[cfg(feature = "nats")]
mod nats_sink {
    use super::*;

    pub struct NatsEventSink {
        client: async_nats::Client,
        subject_prefix: String,
    }

    impl NatsEventSink {
        pub fn new(client: async_nats::Client, subject_prefix: impl Into<String>) -> Self {
            Self {
                client,
                subject_prefix: subject_prefix.into(),
            }
        }
    }

    #[async_trait]
    impl EventSink for NatsEventSink {
        async fn publish_stock_event(&self, event: StockEvent) {
            let subject = format!("{}.{}", self.subject_prefix, event.event_type);
            match serde_json::to_vec(&event) {
                Ok(payload) => {
                    if let Err(e) = self.client.publish(subject, payload.into()).await {
                        tracing::error!(error = %e, "failed to publish stock event to NATS");
                    }
                },
                Err(e) => tracing::error!(error = %e, "failed to serialize stock event"),
            }
        }

        async fn publish_low_stock_event(&self, event: LowStockEvent) {
            let subject = format!("{}.low_stock", self.subject_prefix);
            match serde_json::to_vec(&event) {
                Ok(payload) => {
                    if let Err(e) = self.client.publish(subject, payload.into()).await {
                        tracing::error!(error = %e, "failed to publish low stock event to NATS");
                    }
                },
                Err(e) => tracing::error!(error = %e, "failed to serialize low stock event"),
            }
        }
    }
}

#[cfg(feature = "nats")]
pub use nats_sink::NatsEventSink;

pub mod event_types {
    pub const RECEIPT: &str = "receipt";
    pub const SALE: &str = "sale";
    pub const ADJUSTMENT: &str = "adjustment";
    pub const TRANSFER_IN: &str = "transfer_in";
    pub const TRANSFER_OUT: &str = "transfer_out";
    pub const RESERVATION: &str = "reservation";
    pub const RELEASE: &str = "release";
    pub const COMMIT: &str = "commit";
    pub const RETURN: &str = "return";
    pub const DAMAGE: &str = "damage";
    pub const LOSS: &str = "loss";
    pub const FOUND: &str = "found";
    pub const COUNT_ADJUSTMENT: &str = "count_adjustment";
    pub const LOW_STOCK: &str = "low_stock";
}
