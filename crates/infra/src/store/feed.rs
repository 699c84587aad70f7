use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockdeck_inventory::StockMovement;

/// A movement as persisted by a store: stamped with a store-assigned,
/// monotonically increasing sequence number.
///
/// Sequence numbers define the cross-client ordering — whatever the store
/// assigned wins, not client submission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMovement {
    pub sequence_number: u64,
    pub movement: StockMovement,
}

/// Message pushed to feed subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    /// Full snapshot of the log in sequence order. Always the first message
    /// a new subscriber receives; consumers apply it by wholesale
    /// replacement, never by merging.
    Snapshot(Vec<StoredMovement>),
    /// One movement appended after the subscriber's snapshot was taken.
    Appended(StoredMovement),
}

/// Movement store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("append failed: {0}")]
    Append(String),

    #[error("feed publication failed: {0}")]
    Publish(String),
}
