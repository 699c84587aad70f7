//! Ephemeral notifications and level-triggered out-of-stock messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockdeck_core::{MessageId, NotificationId};

use crate::movement::{Direction, StockKey, StockMovement};

/// Oldest notifications are evicted past this cap.
pub const NOTIFICATION_CAP: usize = 25;

/// Informational record emitted per recorded movement.
///
/// Event-triggered and append-only from the user's point of view: clearing
/// the panel is the only mutation, and nothing here affects stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub text: String,
    pub direction: Direction,
    pub at: DateTime<Utc>,
}

impl Notification {
    /// Build the panel text for a movement: direction, key, quantity, and
    /// the supplier/price details when present.
    pub fn for_movement(movement: &StockMovement) -> Self {
        let mut text = format!(
            "{} • {} • {} • {}",
            movement.direction.label(),
            movement.item,
            movement.item_type,
            movement.qty
        );
        if let Some(source) = &movement.source {
            text.push_str(&format!(" • {source}"));
        }
        if let Some(price) = movement.price {
            text.push_str(&format!(" • {price}"));
        }

        Self {
            id: NotificationId::new(),
            text,
            direction: movement.direction,
            at: movement.recorded_at,
        }
    }
}

/// Out-of-stock message for one (item, type) key.
///
/// Level-triggered, unlike [`Notification`]: it exists while the key's
/// derived level is zero and the key is unacknowledged today, and is removed
/// by the reconciliation pass the moment the level rises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutOfStockMessage {
    pub id: MessageId,
    pub key: StockKey,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl OutOfStockMessage {
    pub fn new(key: StockKey) -> Self {
        Self {
            id: MessageId::new(),
            text: format!("Out of stock: {key}"),
            key,
            at: Utc::now(),
        }
    }
}
