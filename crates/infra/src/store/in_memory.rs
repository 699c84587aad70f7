use std::sync::RwLock;

use stockdeck_events::{Event, EventBus, InMemoryEventBus, Subscription};
use stockdeck_inventory::StockMovement;

use super::feed::{FeedMessage, StoreError, StoredMovement};
use super::r#trait::MovementStore;

/// In-memory append-only movement store with a push feed.
///
/// Intended for tests and single-process deployments. Not optimized for
/// performance.
#[derive(Debug, Default)]
pub struct InMemoryMovementStore {
    log: RwLock<Vec<StoredMovement>>,
    bus: InMemoryEventBus<FeedMessage>,
}

impl InMemoryMovementStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_sequence(log: &[StoredMovement]) -> u64 {
        log.last().map(|e| e.sequence_number).unwrap_or(0)
    }
}

impl MovementStore for InMemoryMovementStore {
    fn append(&self, movement: StockMovement) -> Result<StoredMovement, StoreError> {
        let mut log = self
            .log
            .write()
            .map_err(|_| StoreError::Append("lock poisoned".to_string()))?;

        let stored = StoredMovement {
            sequence_number: Self::current_sequence(&log) + 1,
            movement,
        };
        log.push(stored.clone());

        tracing::debug!(
            event = stored.movement.event_type(),
            sequence = stored.sequence_number,
            "movement appended"
        );

        // Publish only after the append itself succeeded.
        self.bus
            .publish(FeedMessage::Appended(stored.clone()))
            .map_err(|e| StoreError::Publish(format!("{e:?}")))?;

        Ok(stored)
    }

    fn subscribe(&self) -> Subscription<FeedMessage> {
        let snapshot = self.log.read().map(|log| log.clone()).unwrap_or_default();
        self.bus.subscribe_seeded([FeedMessage::Snapshot(snapshot)])
    }
}
