use std::sync::Arc;

use stockdeck_events::Subscription;
use stockdeck_inventory::StockMovement;

use super::feed::{FeedMessage, StoreError, StoredMovement};

/// Append-only movement store.
///
/// The two-operation contract the rest of the system depends on:
///
/// - `append` persists one movement and assigns it the next sequence number;
/// - `subscribe` opens a push feed that delivers a full snapshot first, then
///   every movement appended afterwards.
///
/// Implementations must never mutate or drop persisted movements, and must
/// publish an appended movement only after the append itself succeeded.
pub trait MovementStore: Send + Sync {
    fn append(&self, movement: StockMovement) -> Result<StoredMovement, StoreError>;

    fn subscribe(&self) -> Subscription<FeedMessage>;
}

impl<S> MovementStore for Arc<S>
where
    S: MovementStore + ?Sized,
{
    fn append(&self, movement: StockMovement) -> Result<StoredMovement, StoreError> {
        (**self).append(movement)
    }

    fn subscribe(&self) -> Subscription<FeedMessage> {
        (**self).subscribe()
    }
}
