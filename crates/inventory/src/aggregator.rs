//! The inventory aggregator: owner of the movement log and all derived state.
//!
//! Ownership rules:
//! - the movement log is append-only and never floored, trimmed, or edited;
//! - stock levels, selectable catalogs, KPIs, and out-of-stock messages are
//!   derived from the log on demand — there is no independently mutable
//!   counter anywhere;
//! - the message set is reconciled with a full pass after every mutation,
//!   never patched incrementally, so it cannot drift from the levels.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use stockdeck_core::{DomainError, DomainResult, EventId};

use crate::catalog::{Catalog, CatalogKind};
use crate::movement::{Direction, StockKey, StockMovement};
use crate::notification::{NOTIFICATION_CAP, Notification, OutOfStockMessage};
use crate::report::{ReportFilter, ReportRow, build_report};
use crate::state::InventoryState;
use crate::summary::{KpiSummary, StockSummaryRow, kpi_summary, stock_summary};

/// Input for recording one stock movement.
///
/// Quantity is a signed integer on purpose: form input is permissive, and the
/// validation (`qty > 0`) belongs to [`InventoryAggregator::record_movement`],
/// not the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMovement {
    pub item: String,
    pub item_type: String,
    pub qty: i64,
    pub direction: Direction,
    pub recorded_at: DateTime<Utc>,
    pub source: Option<String>,
    pub price: Option<f64>,
    pub invoice: Option<String>,
}

/// Single owner of the inventory state.
///
/// Created once per running application instance (injected into views by the
/// provider), mutated synchronously, and read through derivation methods.
#[derive(Debug, Clone)]
pub struct InventoryAggregator {
    movements: Vec<StockMovement>,
    catalog: Catalog,
    /// Newest first, capped at [`NOTIFICATION_CAP`].
    notifications: Vec<Notification>,
    messages: BTreeMap<StockKey, OutOfStockMessage>,
    acknowledged_today: BTreeSet<StockKey>,
    ack_day: NaiveDate,
}

impl InventoryAggregator {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            movements: Vec::new(),
            catalog: Catalog::new(),
            notifications: Vec::new(),
            messages: BTreeMap::new(),
            acknowledged_today: BTreeSet::new(),
            ack_day: today,
        }
    }

    /// Restore from persisted state, then reconcile so the message set is
    /// consistent with the restored log regardless of what was saved.
    pub fn from_state(state: InventoryState, today: NaiveDate) -> Self {
        let mut aggregator = Self {
            movements: state.movements,
            catalog: state.catalog,
            notifications: state.notifications,
            messages: state
                .messages
                .into_iter()
                .map(|m| (m.key.clone(), m))
                .collect(),
            acknowledged_today: BTreeSet::new(),
            ack_day: today,
        };
        aggregator.reconcile_messages();
        aggregator
    }

    pub fn to_state(&self) -> InventoryState {
        InventoryState {
            movements: self.movements.clone(),
            catalog: self.catalog.clone(),
            notifications: self.notifications.clone(),
            messages: self.messages.values().cloned().collect(),
        }
    }

    /// Record one stock movement.
    ///
    /// Validation failures (blank item/type, non-positive quantity) leave the
    /// log untouched and return `DomainError::Validation`. On success the
    /// movement is appended, an unknown source is auto-declared, a
    /// notification is pushed, and messages are reconciled — the derived
    /// level changes atomically with the append.
    pub fn record_movement(&mut self, cmd: RecordMovement) -> DomainResult<StockMovement> {
        let item = cmd.item.trim();
        if item.is_empty() {
            return Err(DomainError::validation("item cannot be empty"));
        }
        let item_type = cmd.item_type.trim();
        if item_type.is_empty() {
            return Err(DomainError::validation("type cannot be empty"));
        }
        let qty = u32::try_from(cmd.qty)
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| DomainError::validation("quantity must be positive"))?;

        let source = cmd
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        if let Some(src) = &source {
            if !self.catalog.has_source(src) {
                self.catalog.add_source(src)?;
            }
        }

        let movement = StockMovement {
            id: EventId::new(),
            item: item.to_string(),
            item_type: item_type.to_string(),
            qty,
            direction: cmd.direction,
            recorded_at: cmd.recorded_at,
            source,
            price: cmd.price,
            invoice: cmd
                .invoice
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        };

        self.push_notification(Notification::for_movement(&movement));
        self.movements.push(movement.clone());
        self.reconcile_messages();

        Ok(movement)
    }

    /// Declare a catalog entry (idempotent; clears a prior exclusion).
    pub fn add_catalog_entry(
        &mut self,
        kind: CatalogKind,
        name: &str,
        parent: Option<&str>,
    ) -> DomainResult<()> {
        self.catalog.add(kind, name, parent)?;
        self.reconcile_messages();
        Ok(())
    }

    /// Soft-delete a catalog entry. Historical movements referencing the name
    /// are untouched: the log length is invariant under this operation.
    pub fn remove_catalog_entry(
        &mut self,
        kind: CatalogKind,
        name: &str,
        parent: Option<&str>,
    ) -> DomainResult<()> {
        self.catalog.remove(kind, name, parent)?;
        self.reconcile_messages();
        Ok(())
    }

    /// Derived stock level for a key, floored at zero for display.
    ///
    /// The log itself is never floored: an OUT exceeding the running total is
    /// recorded as-is and only the exposed value clamps.
    pub fn current_level(&self, key: &StockKey) -> u64 {
        self.net_level(key).max(0) as u64
    }

    /// Floored levels for every key appearing in the log.
    pub fn levels(&self) -> BTreeMap<StockKey, u64> {
        self.net_levels()
            .into_iter()
            .map(|(key, net)| (key, net.max(0) as u64))
            .collect()
    }

    pub fn selectable_items(&self) -> Vec<String> {
        self.catalog
            .selectable_items(self.movements.iter().map(|m| m.item.as_str()))
    }

    pub fn selectable_types(&self, item: &str) -> Vec<String> {
        let observed = self
            .movements
            .iter()
            .filter(|m| m.item == item)
            .map(|m| m.item_type.as_str());
        self.catalog.selectable_types(item, observed)
    }

    pub fn selectable_sources(&self) -> Vec<String> {
        let observed = self
            .movements
            .iter()
            .filter_map(|m| m.source.as_deref());
        self.catalog.selectable_sources(observed)
    }

    /// Suppress the out-of-stock message for `key` for the current calendar
    /// day. The suppression does not survive a non-zero excursion or a day
    /// rollover, whichever happens first.
    pub fn acknowledge_zero(&mut self, key: &StockKey) {
        self.acknowledged_today.insert(key.clone());
        self.messages.remove(key);
        self.reconcile_messages();
    }

    /// Reset acknowledgements when the calendar day changed. Driven by a
    /// periodic worker, independent of mutations.
    pub fn roll_day(&mut self, today: NaiveDate) {
        if today == self.ack_day {
            return;
        }
        self.ack_day = today;
        self.acknowledged_today.clear();
        self.reconcile_messages();
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }

    /// Replace the local movement log wholesale from a feed snapshot
    /// (last write wins, no merge).
    pub fn apply_snapshot(&mut self, movements: Vec<StockMovement>) {
        self.movements = movements;
        self.register_observed_sources();
        self.reconcile_messages();
    }

    /// Integrate one remotely appended movement. Idempotent: the echo of a
    /// locally recorded movement is dropped by its id.
    pub fn integrate_movement(&mut self, movement: StockMovement) {
        if self.movements.iter().any(|m| m.id == movement.id) {
            return;
        }
        if let Some(src) = &movement.source {
            if !self.catalog.has_source(src) {
                let _ = self.catalog.add_source(src);
            }
        }
        self.movements.push(movement);
        self.reconcile_messages();
    }

    pub fn movements(&self) -> &[StockMovement] {
        &self.movements
    }

    /// Notifications, newest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn messages(&self) -> impl Iterator<Item = &OutOfStockMessage> {
        self.messages.values()
    }

    pub fn has_message(&self, key: &StockKey) -> bool {
        self.messages.contains_key(key)
    }

    pub fn kpi_summary(&self) -> KpiSummary {
        kpi_summary(&self.movements)
    }

    pub fn stock_summary(&self) -> Vec<StockSummaryRow> {
        stock_summary(&self.movements)
    }

    pub fn report(&self, filter: &ReportFilter) -> Vec<ReportRow> {
        build_report(&self.movements, filter)
    }

    fn net_level(&self, key: &StockKey) -> i64 {
        self.movements
            .iter()
            .filter(|m| m.matches(key))
            .map(StockMovement::signed_delta)
            .sum()
    }

    fn net_levels(&self) -> BTreeMap<StockKey, i64> {
        let mut nets = BTreeMap::new();
        for m in &self.movements {
            *nets.entry(m.key()).or_insert(0) += m.signed_delta();
        }
        nets
    }

    fn push_notification(&mut self, notification: Notification) {
        self.notifications.insert(0, notification);
        self.notifications.truncate(NOTIFICATION_CAP);
    }

    fn register_observed_sources(&mut self) {
        let observed: Vec<String> = self
            .movements
            .iter()
            .filter_map(|m| m.source.clone())
            .filter(|s| !self.catalog.has_source(s))
            .collect();
        for src in observed {
            let _ = self.catalog.add_source(&src);
        }
    }

    /// Reconciliation pass: for every key in the log with a floored level of
    /// zero and no acknowledgement today, ensure exactly one message; for
    /// every key above zero, drop the message and the acknowledgement (a
    /// non-zero excursion resets it). Full recomputation each time — no
    /// incremental patching, no drift.
    fn reconcile_messages(&mut self) {
        let nets = self.net_levels();

        // Keys that left the log entirely (snapshot replacement) lose their
        // messages too.
        self.messages.retain(|key, _| nets.contains_key(key));

        for (key, net) in &nets {
            if *net <= 0 {
                if !self.acknowledged_today.contains(key) && !self.messages.contains_key(key) {
                    self.messages
                        .insert(key.clone(), OutOfStockMessage::new(key.clone()));
                }
            } else {
                self.messages.remove(key);
                self.acknowledged_today.remove(key);
            }
        }
    }
}
