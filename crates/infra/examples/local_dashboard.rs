//! Demo session against a throwaway local state file.
//!
//! Run with: `cargo run -p stockdeck-infra --example local_dashboard`

use stockdeck_infra::{LocalStateStore, StockService};
use stockdeck_inventory::{ReportFilter, StockKey};

fn main() {
    stockdeck_observability::init();

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let service = StockService::with_local(LocalStateStore::with_path(dir.path().join("state.json")));

    service.stock_in("Boxes", "Small", 50, Some("Warehouse".to_string()), Some(100.0), Some("INV-42".to_string()));
    service.stock_out("Boxes", "Small", 60);
    service.stock_out("Gloves", "Nitrile", 5);

    let kpis = service.kpi_summary();
    println!("stock in: {}%  stock out: {}  empty keys: {}", kpis.pct_in, kpis.total_out, kpis.empty_count);

    println!("\ntotal stock:");
    for row in service.stock_summary() {
        println!("  {:<20} {:>5}", row.key.to_string(), row.quantity);
    }

    println!("\nmessages:");
    for message in service.messages() {
        println!("  {}", message.text);
    }
    service.acknowledge_zero(&StockKey::new("Boxes", "Small"));
    println!("after acknowledging Boxes • Small: {} message(s) left", service.messages().len());

    println!("\nsupplier report rows: {}", service.report(&ReportFilter::default()).len());
}
