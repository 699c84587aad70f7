//! KPI and per-key summary derivations.
//!
//! Pure functions over the movement log; the aggregator exposes thin
//! delegating methods so views never hold derived state of their own.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::movement::{Direction, StockKey, StockMovement};

/// Dashboard KPI tiles: percent stock-in, total stock-out, empty keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KpiSummary {
    /// Share of IN quantity over all moved quantity, rounded to whole
    /// percent; 0 when the log is empty.
    pub pct_in: u32,
    pub total_out: u64,
    /// Number of keys whose derived level is zero.
    pub empty_count: usize,
}

/// One row of the "total stock" view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockSummaryRow {
    pub key: StockKey,
    pub quantity: u64,
    pub last_in: Option<DateTime<Utc>>,
    pub last_out: Option<DateTime<Utc>>,
}

pub fn kpi_summary(movements: &[StockMovement]) -> KpiSummary {
    let mut total_in: u64 = 0;
    let mut total_out: u64 = 0;
    let mut nets: BTreeMap<StockKey, i64> = BTreeMap::new();

    for m in movements {
        match m.direction {
            Direction::In => total_in += u64::from(m.qty),
            Direction::Out => total_out += u64::from(m.qty),
        }
        *nets.entry(m.key()).or_insert(0) += m.signed_delta();
    }

    let denom = total_in + total_out;
    let pct_in = if denom == 0 {
        0
    } else {
        ((total_in as f64 / denom as f64) * 100.0).round() as u32
    };

    KpiSummary {
        pct_in,
        total_out,
        empty_count: nets.values().filter(|net| **net <= 0).count(),
    }
}

/// Per-key quantity plus last IN / last OUT timestamps, sorted by item then
/// type.
pub fn stock_summary(movements: &[StockMovement]) -> Vec<StockSummaryRow> {
    struct Entry {
        net: i64,
        last_in: Option<DateTime<Utc>>,
        last_out: Option<DateTime<Utc>>,
    }

    let mut entries: BTreeMap<StockKey, Entry> = BTreeMap::new();
    for m in movements {
        let entry = entries.entry(m.key()).or_insert(Entry {
            net: 0,
            last_in: None,
            last_out: None,
        });
        entry.net += m.signed_delta();
        let seen = match m.direction {
            Direction::In => &mut entry.last_in,
            Direction::Out => &mut entry.last_out,
        };
        *seen = Some(seen.map_or(m.recorded_at, |t| t.max(m.recorded_at)));
    }

    entries
        .into_iter()
        .map(|(key, entry)| StockSummaryRow {
            key,
            quantity: entry.net.max(0) as u64,
            last_in: entry.last_in,
            last_out: entry.last_out,
        })
        .collect()
}
