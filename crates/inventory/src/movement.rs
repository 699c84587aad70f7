use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockdeck_core::{EventId, ValueObject};
use stockdeck_events::Event;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// Human-readable label used in notification texts.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::In => "Stock In",
            Direction::Out => "Stock Out",
        }
    }
}

/// The (item, type) pair every derived level, message, and acknowledgement
/// is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StockKey {
    pub item: String,
    pub item_type: String,
}

impl StockKey {
    pub fn new(item: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            item_type: item_type.into(),
        }
    }
}

impl ValueObject for StockKey {}

impl core::fmt::Display for StockKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} • {}", self.item, self.item_type)
    }
}

/// An immutable record of one stock movement.
///
/// Movements are the sole source of truth for quantities: once recorded they
/// are never mutated or deleted, and every derived level is recomputed from
/// them. Quantity is strictly positive by construction; direction plus
/// quantity determine the signed contribution to stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: EventId,
    pub item: String,
    pub item_type: String,
    pub qty: u32,
    pub direction: Direction,
    pub recorded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice: Option<String>,
}

impl StockMovement {
    pub fn key(&self) -> StockKey {
        StockKey::new(self.item.clone(), self.item_type.clone())
    }

    pub fn matches(&self, key: &StockKey) -> bool {
        self.item == key.item && self.item_type == key.item_type
    }

    /// Signed contribution of this movement to its key's running total.
    pub fn signed_delta(&self) -> i64 {
        match self.direction {
            Direction::In => i64::from(self.qty),
            Direction::Out => -i64::from(self.qty),
        }
    }
}

impl Event for StockMovement {
    fn event_type(&self) -> &'static str {
        match self.direction {
            Direction::In => "inventory.stock.in",
            Direction::Out => "inventory.stock.out",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
