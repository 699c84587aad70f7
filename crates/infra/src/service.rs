//! The state provider: one shared, injected owner of the inventory state.
//!
//! `StockService` wraps the aggregator behind a mutex and wires it to a
//! persistence backend. Mutations apply to the local aggregator first and
//! persist fire-and-forget: a failed append or save is logged and swallowed,
//! leaving the in-memory state optimistic until the next successful feed
//! delivery (a deliberate weakness of the modeled system, not a strength).
//!
//! Validation failures are downgraded to debug-logged no-ops at this layer —
//! callers are form inputs that pre-validate, and the permissive contract is
//! "nothing happens", not an error.

use std::sync::{Arc, Mutex};

use chrono::Utc;

use stockdeck_core::DomainError;
use stockdeck_inventory::{
    CatalogKind, Direction, InventoryAggregator, InventoryState, KpiSummary, Notification,
    OutOfStockMessage, RecordMovement, ReportFilter, ReportRow, StockKey, StockSummaryRow,
};

use crate::local_state::LocalStateStore;
use crate::store::{FeedMessage, MovementStore};

enum Backend {
    /// Remote movement store: appends are pushed upstream and echo back
    /// through the feed subscription.
    Remote(Arc<dyn MovementStore>),
    /// Local full-state file: every mutation saves the whole state.
    Local(LocalStateStore),
}

/// Shared inventory state owner, created once per running application.
pub struct StockService {
    aggregator: Mutex<InventoryAggregator>,
    backend: Backend,
}

impl StockService {
    /// Remote-backed service. Starts empty; the initial snapshot arrives
    /// through the store's feed subscription.
    pub fn with_store(store: Arc<dyn MovementStore>) -> Self {
        Self {
            aggregator: Mutex::new(InventoryAggregator::new(Utc::now().date_naive())),
            backend: Backend::Remote(store),
        }
    }

    /// Local-backed service: state is loaded synchronously on construction.
    pub fn with_local(store: LocalStateStore) -> Self {
        let state = store.load();
        Self {
            aggregator: Mutex::new(InventoryAggregator::from_state(
                state,
                Utc::now().date_naive(),
            )),
            backend: Backend::Local(store),
        }
    }

    pub fn stock_in(
        &self,
        item: &str,
        item_type: &str,
        qty: i64,
        source: Option<String>,
        price: Option<f64>,
        invoice: Option<String>,
    ) {
        self.record(RecordMovement {
            item: item.to_string(),
            item_type: item_type.to_string(),
            qty,
            direction: Direction::In,
            recorded_at: Utc::now(),
            source,
            price,
            invoice,
        });
    }

    pub fn stock_out(&self, item: &str, item_type: &str, qty: i64) {
        self.record(RecordMovement {
            item: item.to_string(),
            item_type: item_type.to_string(),
            qty,
            direction: Direction::Out,
            recorded_at: Utc::now(),
            source: None,
            price: None,
            invoice: None,
        });
    }

    fn record(&self, cmd: RecordMovement) {
        let Ok(mut aggregator) = self.aggregator.lock() else {
            tracing::warn!("aggregator lock poisoned; dropping movement");
            return;
        };

        match aggregator.record_movement(cmd) {
            Ok(movement) => match &self.backend {
                Backend::Remote(store) => {
                    // Fire-and-forget: the echo arrives back via the feed.
                    if let Err(err) = store.append(movement) {
                        tracing::warn!(
                            error = %err,
                            "movement append failed; local state is optimistic"
                        );
                    }
                }
                Backend::Local(store) => store.save(&aggregator.to_state()),
            },
            Err(DomainError::Validation(reason)) => {
                tracing::debug!(%reason, "ignoring invalid movement input");
            }
            Err(err) => {
                tracing::warn!(error = %err, "movement rejected");
            }
        }
    }

    pub fn add_catalog_entry(&self, kind: CatalogKind, name: &str, parent: Option<&str>) {
        self.mutate(|aggregator| aggregator.add_catalog_entry(kind, name, parent));
    }

    pub fn remove_catalog_entry(&self, kind: CatalogKind, name: &str, parent: Option<&str>) {
        self.mutate(|aggregator| aggregator.remove_catalog_entry(kind, name, parent));
    }

    pub fn acknowledge_zero(&self, key: &StockKey) {
        self.mutate(|aggregator| {
            aggregator.acknowledge_zero(key);
            Ok(())
        });
    }

    pub fn clear_notifications(&self) {
        self.mutate(|aggregator| {
            aggregator.clear_notifications();
            Ok(())
        });
    }

    /// Calendar-day rollover check; invoked by the periodic worker.
    pub fn roll_day(&self) {
        self.mutate(|aggregator| {
            aggregator.roll_day(Utc::now().date_naive());
            Ok(())
        });
    }

    /// Apply one feed delivery. Snapshots replace the local log wholesale;
    /// appends integrate idempotently (our own echoes are dropped by id).
    pub fn apply_feed(&self, message: FeedMessage) {
        self.mutate(|aggregator| {
            match message {
                FeedMessage::Snapshot(log) => {
                    aggregator.apply_snapshot(log.into_iter().map(|s| s.movement).collect());
                }
                FeedMessage::Appended(stored) => {
                    aggregator.integrate_movement(stored.movement);
                }
            }
            Ok(())
        });
    }

    fn mutate(
        &self,
        op: impl FnOnce(&mut InventoryAggregator) -> stockdeck_core::DomainResult<()>,
    ) {
        let Ok(mut aggregator) = self.aggregator.lock() else {
            tracing::warn!("aggregator lock poisoned; dropping mutation");
            return;
        };

        match op(&mut aggregator) {
            Ok(()) => {
                if let Backend::Local(store) = &self.backend {
                    store.save(&aggregator.to_state());
                }
            }
            Err(DomainError::Validation(reason)) => {
                tracing::debug!(%reason, "ignoring invalid input");
            }
            Err(err) => {
                tracing::warn!(error = %err, "mutation rejected");
            }
        }
    }

    pub fn current_level(&self, key: &StockKey) -> u64 {
        self.read(|aggregator| aggregator.current_level(key))
    }

    pub fn selectable_items(&self) -> Vec<String> {
        self.read(|aggregator| aggregator.selectable_items())
    }

    pub fn selectable_types(&self, item: &str) -> Vec<String> {
        self.read(|aggregator| aggregator.selectable_types(item))
    }

    pub fn selectable_sources(&self) -> Vec<String> {
        self.read(|aggregator| aggregator.selectable_sources())
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.read(|aggregator| aggregator.notifications().to_vec())
    }

    pub fn messages(&self) -> Vec<OutOfStockMessage> {
        self.read(|aggregator| aggregator.messages().cloned().collect())
    }

    pub fn kpi_summary(&self) -> KpiSummary {
        self.read(|aggregator| aggregator.kpi_summary())
    }

    pub fn stock_summary(&self) -> Vec<StockSummaryRow> {
        self.read(|aggregator| aggregator.stock_summary())
    }

    pub fn report(&self, filter: &ReportFilter) -> Vec<ReportRow> {
        self.read(|aggregator| aggregator.report(filter))
    }

    /// Snapshot of the full state (persistence unit).
    pub fn state(&self) -> InventoryState {
        self.read(|aggregator| aggregator.to_state())
    }

    fn read<T: Default>(&self, op: impl FnOnce(&InventoryAggregator) -> T) -> T {
        self.aggregator
            .lock()
            .map(|aggregator| op(&aggregator))
            .unwrap_or_default()
    }
}
