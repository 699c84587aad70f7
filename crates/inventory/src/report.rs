//! Supplier report rows: stock-IN movements filtered by date range and
//! supplier.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use stockdeck_core::EventId;

use crate::movement::{Direction, StockMovement};

/// Report filter. `from`/`to` are calendar days; `to` is inclusive of the
/// whole end day. `source` restricts to one supplier when set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub source: Option<String>,
}

/// One flat report record, ready for tabular export.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub id: EventId,
    pub at: DateTime<Utc>,
    pub invoice: Option<String>,
    pub item: String,
    pub item_type: String,
    pub qty: u32,
    pub source: Option<String>,
    pub price: Option<f64>,
}

fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Build report rows from the log. Only stock-IN movements qualify; rows keep
/// log order.
pub fn build_report(movements: &[StockMovement], filter: &ReportFilter) -> Vec<ReportRow> {
    let from = filter.from.map(day_start);
    // Upper bound is exclusive of the day after `to`.
    let until = filter.to.and_then(|d| d.succ_opt()).map(day_start);

    movements
        .iter()
        .filter(|m| m.direction == Direction::In)
        .filter(|m| from.is_none_or(|f| m.recorded_at >= f))
        .filter(|m| until.is_none_or(|u| m.recorded_at < u))
        .filter(|m| match &filter.source {
            Some(source) => m.source.as_deref() == Some(source.as_str()),
            None => true,
        })
        .map(|m| ReportRow {
            id: m.id,
            at: m.recorded_at,
            invoice: m.invoice.clone(),
            item: m.item.clone(),
            item_type: m.item_type.clone(),
            qty: m.qty,
            source: m.source.clone(),
            price: m.price,
        })
        .collect()
}
