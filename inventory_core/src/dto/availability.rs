//! DTOs for the read-only availability checks (spec.md §4.3).

use serde::{Deserialize, Serialize};

fn default_location() -> Option<String> {
    None
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckAvailabilityRequest {
    pub sku: String,
    pub quantity: i64,
    #[serde(default = "default_location")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationAvailability {
    pub location: String,
    pub quantity_on_hand: i64,
    pub quantity_reserved: i64,
    pub quantity_available: i64,
    pub backorderable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityReport {
    pub sku: String,
    pub requested_quantity: i64,
    pub total_available: i64,
    pub is_available: bool,
    pub backorderable: bool,
    pub per_location: Vec<LocationAvailability>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkuAggregate {
    pub sku: String,
    pub total_on_hand: i64,
    pub total_reserved: i64,
    pub total_available: i64,
}
