//! Full serializable provider state (the local-backend persistence unit).

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::movement::StockMovement;
use crate::notification::{Notification, OutOfStockMessage};

/// Everything the local backend persists as one document.
///
/// The acknowledgement-for-today set is deliberately absent: it is session
/// state, reset on day rollover anyway, and reloading state re-derives the
/// message set from the log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryState {
    #[serde(default)]
    pub movements: Vec<StockMovement>,
    #[serde(default)]
    pub catalog: Catalog,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub messages: Vec<OutOfStockMessage>,
}
