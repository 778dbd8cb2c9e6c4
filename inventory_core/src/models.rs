//! Domain entities: `InventoryItem` and `StockMovement` (spec.md §3.1).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The closed set of movement types a `StockMovement` can carry (spec.md §3.1).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum MovementType {
    Receipt,
    Sale,
    Adjustment,
    TransferIn,
    TransferOut,
    Reservation,
    Release,
    Commit,
    Return,
    Damage,
    Loss,
    Found,
    CountAdjustment,
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MovementType::Receipt => "receipt",
            MovementType::Sale => "sale",
            MovementType::Adjustment => "adjustment",
            MovementType::TransferIn => "transfer_in",
            MovementType::TransferOut => "transfer_out",
            MovementType::Reservation => "reservation",
            MovementType::Release => "release",
            MovementType::Commit => "commit",
            MovementType::Return => "return",
            MovementType::Damage => "damage",
            MovementType::Loss => "loss",
            MovementType::Found => "found",
            MovementType::CountAdjustment => "count_adjustment",
        };
        f.write_str(s)
    }
}

impl FromStr for MovementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "receipt" => Ok(MovementType::Receipt),
            "sale" => Ok(MovementType::Sale),
            "adjustment" => Ok(MovementType::Adjustment),
            "transfer_in" => Ok(MovementType::TransferIn),
            "transfer_out" => Ok(MovementType::TransferOut),
            "reservation" => Ok(MovementType::Reservation),
            "release" => Ok(MovementType::Release),
            "commit" => Ok(MovementType::Commit),
            "return" => Ok(MovementType::Return),
            "damage" => Ok(MovementType::Damage),
            "loss" => Ok(MovementType::Loss),
            "found" => Ok(MovementType::Found),
            "count_adjustment" => Ok(MovementType::CountAdjustment),
            other => Err(format!("unknown movement type: {other}")),
        }
    }
}

/// A (SKU, location) pair with quantity counters (spec.md §3.1).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct InventoryItem {
    pub id: Uuid,
    pub sku: String,
    pub location: String,
    pub quantity_on_hand: i64,
    pub quantity_reserved: i64,
    pub reorder_point: Option<i64>,
    pub reorder_quantity: Option<i64>,
    pub backorderable: bool,
    pub metadata: Json,
    pub lock_version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// `quantity_on_hand - quantity_reserved` (spec.md §3.1 "Derived").
    pub fn quantity_available(&self) -> i64 {
        self.quantity_on_hand - self.quantity_reserved
    }

    /// `None` means "unbounded" (backorderable); `Some(n)` is the hard ceiling.
    pub fn available_to_promise(&self) -> Option<i64> {
        if self.backorderable {
            None
        } else {
            Some(self.quantity_available())
        }
    }

    /// `can_reserve(q) ≡ backorderable ∨ available ≥ q` (spec.md §4.2 `reserve`).
    pub fn can_reserve(&self, quantity: i64) -> bool {
        self.backorderable || self.quantity_available() >= quantity
    }

    /// `can_fulfill(q) ≡ backorderable ∨ available ≥ q` (spec.md §4.2 `transfer`).
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.can_reserve(quantity)
    }

    pub fn is_in_stock(&self) -> bool {
        self.quantity_available() > 0
    }

    pub fn is_low_stock(&self) -> bool {
        match self.reorder_point {
            Some(point) => self.quantity_available() <= point,
            None => false,
        }
    }
}

/// An immutable ledger entry describing one change to one `InventoryItem`
/// (spec.md §3.1).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct StockMovement {
    pub id: Uuid,
    pub inventory_item_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub quantity_before: i64,
    pub quantity_after: i64,
    pub reason: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    pub metadata: Json,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(on_hand: i64, reserved: i64, backorderable: bool, reorder_point: Option<i64>) -> InventoryItem {
        InventoryItem {
            id: Uuid::nil(),
            sku: "WIDGET-001".to_string(),
            location: "default".to_string(),
            quantity_on_hand: on_hand,
            quantity_reserved: reserved,
            reorder_point,
            reorder_quantity: Some(10),
            backorderable,
            metadata: serde_json::json!({}),
            lock_version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn quantity_available_subtracts_reserved() {
        assert_eq!(item(10, 3, false, None).quantity_available(), 7);
    }

    #[test]
    fn available_to_promise_unbounded_when_backorderable() {
        assert_eq!(item(0, 0, true, None).available_to_promise(), None);
        assert_eq!(item(5, 2, false, None).available_to_promise(), Some(3));
    }

    #[test]
    fn can_reserve_respects_backorderable_flag() {
        let non_backorderable = item(2, 0, false, None);
        assert!(non_backorderable.can_reserve(2));
        assert!(!non_backorderable.can_reserve(3));

        let backorderable = item(0, 0, true, None);
        assert!(backorderable.can_reserve(100));
    }

    #[test]
    fn low_stock_ignores_unset_reorder_point() {
        assert!(!item(1, 0, false, None).is_low_stock());
        assert!(item(1, 0, false, Some(5)).is_low_stock());
        assert!(!item(10, 0, false, Some(5)).is_low_stock());
    }

    #[test]
    fn movement_type_round_trips_through_display_and_from_str() {
        for mt in [
            MovementType::Receipt,
            MovementType::Sale,
            MovementType::Adjustment,
            MovementType::TransferIn,
            MovementType::TransferOut,
            MovementType::Reservation,
            MovementType::Release,
            MovementType::Commit,
            MovementType::Return,
            MovementType::Damage,
            MovementType::Loss,
            MovementType::Found,
            MovementType::CountAdjustment,
        ] {
            assert_eq!(mt.to_string().parse::<MovementType>().unwrap(), mt);
        }
    }
}
