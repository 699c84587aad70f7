//! `stockdeck-inventory` — the inventory state-derivation core.
//!
//! The [`InventoryAggregator`] owns the append-only movement log, the
//! explicit/excluded catalogs, notifications, out-of-stock messages, and the
//! per-day acknowledgement set. Every other value exposed by this crate
//! (stock levels, selectable catalogs, KPIs, summaries, reports) is a pure
//! function of that owned state, recomputed from the log on every read.

pub mod aggregator;
pub mod catalog;
pub mod movement;
pub mod notification;
pub mod report;
pub mod state;
pub mod summary;

pub use aggregator::{InventoryAggregator, RecordMovement};
pub use catalog::{Catalog, CatalogKind};
pub use movement::{Direction, StockKey, StockMovement};
pub use notification::{NOTIFICATION_CAP, Notification, OutOfStockMessage};
pub use report::{ReportFilter, ReportRow, build_report};
pub use state::InventoryState;
pub use summary::{KpiSummary, StockSummaryRow, kpi_summary, stock_summary};
