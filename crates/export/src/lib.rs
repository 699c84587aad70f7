//! `stockdeck-export` — spreadsheet export of supplier report rows.
//!
//! A pure formatting pass over rows the aggregator already computed: no
//! state, no filtering of its own. The column layout is the supplier report
//! sheet the dashboard downloads.

use std::io::Write;

use thiserror::Error;

use stockdeck_inventory::ReportRow;

/// Column headers of the supplier report sheet.
const HEADERS: [&str; 7] = [
    "DATE (stock in)",
    "Invoice No.",
    "Item",
    "Type",
    "Quantity",
    "Supplier",
    "Price",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("export is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Write report rows as CSV to any writer.
pub fn write_report<W: Write>(rows: &[ReportRow], writer: W) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(HEADERS)?;
    for row in rows {
        csv.write_record([
            row.at.format("%Y-%m-%d %H:%M:%S").to_string(),
            row.invoice.clone().unwrap_or_default(),
            row.item.clone(),
            row.item_type.clone(),
            row.qty.to_string(),
            row.source.clone().unwrap_or_default(),
            row.price.map(|p| format!("{p:.2}")).unwrap_or_default(),
        ])?;
    }
    csv.flush().map_err(csv::Error::from)?;

    Ok(())
}

/// Render report rows as an in-memory CSV document.
pub fn report_to_csv(rows: &[ReportRow]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_report(rows, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use stockdeck_core::EventId;

    fn row(invoice: Option<&str>, source: Option<&str>, price: Option<f64>) -> ReportRow {
        ReportRow {
            id: EventId::new(),
            at: Utc.with_ymd_and_hms(2024, 3, 14, 9, 30, 0).unwrap(),
            invoice: invoice.map(str::to_owned),
            item: "Boxes".to_string(),
            item_type: "Small".to_string(),
            qty: 20,
            source: source.map(str::to_owned),
            price,
        }
    }

    #[test]
    fn header_row_matches_the_sheet_layout() {
        let csv = report_to_csv(&[]).unwrap();
        assert_eq!(
            csv.lines().next(),
            Some("DATE (stock in),Invoice No.,Item,Type,Quantity,Supplier,Price")
        );
    }

    #[test]
    fn one_line_per_row_with_formatted_fields() {
        let rows = vec![row(Some("INV-42"), Some("Warehouse"), Some(100.0))];
        let csv = report_to_csv(&rows).unwrap();

        let mut lines = csv.lines();
        lines.next(); // header
        assert_eq!(
            lines.next(),
            Some("2024-03-14 09:30:00,INV-42,Boxes,Small,20,Warehouse,100.00")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn missing_optionals_render_as_empty_cells() {
        let rows = vec![row(None, None, None)];
        let csv = report_to_csv(&rows).unwrap();

        let mut lines = csv.lines();
        lines.next();
        assert_eq!(lines.next(), Some("2024-03-14 09:30:00,,Boxes,Small,20,,"));
    }
}
