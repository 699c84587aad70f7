//! Integration tests for the full provider pipeline.
//!
//! Tests: StockService → MovementStore → feed → FeedWorker → aggregator,
//! plus the local full-state backend.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use stockdeck_inventory::{CatalogKind, StockKey};

    use crate::local_state::LocalStateStore;
    use crate::service::StockService;
    use crate::store::{InMemoryMovementStore, MovementStore};
    use crate::worker::{FeedWorker, RolloverWorker};

    fn setup() {
        stockdeck_observability::init();
    }

    /// Helper: wait a short time for the feed worker to process deliveries.
    fn wait_for_feed() {
        std::thread::sleep(Duration::from_millis(50));
    }

    #[test]
    fn local_backend_persists_state_across_service_instances() {
        setup();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let key = StockKey::new("Crates", "Wooden");

        {
            let service = StockService::with_local(LocalStateStore::with_path(&path));
            service.stock_in("Crates", "Wooden", 30, Some("Warehouse".to_string()), None, None);
            service.stock_out("Crates", "Wooden", 10);
            assert_eq!(service.current_level(&key), 20);
        }

        let reloaded = StockService::with_local(LocalStateStore::with_path(&path));
        assert_eq!(reloaded.current_level(&key), 20);
        assert!(reloaded.selectable_sources().contains(&"Warehouse".to_string()));
        // The default dataset was never mixed in: only our own movements.
        assert_eq!(
            reloaded
                .state()
                .movements
                .iter()
                .filter(|m| m.item == "Crates")
                .count(),
            2
        );
    }

    #[test]
    fn local_backend_starts_from_the_default_dataset() {
        setup();
        let dir = tempfile::tempdir().unwrap();
        let service =
            StockService::with_local(LocalStateStore::with_path(dir.path().join("state.json")));

        // Seed data: Boxes/Small at 10, Gloves/Latex overdrawn to zero.
        assert_eq!(service.current_level(&StockKey::new("Boxes", "Small")), 10);
        assert_eq!(service.current_level(&StockKey::new("Gloves", "Latex")), 0);
        assert!(
            service
                .messages()
                .iter()
                .any(|m| m.key == StockKey::new("Gloves", "Latex"))
        );
    }

    #[test]
    fn invalid_inputs_are_silent_no_ops_at_the_service_boundary() {
        setup();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{}").unwrap(); // empty state, no seed data

        let service = StockService::with_local(LocalStateStore::with_path(&path));
        service.stock_in("Tape", "Clear", -5, None, None, None);
        service.stock_out("", "Clear", 5);

        assert!(service.state().movements.is_empty());
        assert!(service.notifications().is_empty());
    }

    #[test]
    fn remote_backend_syncs_a_second_client_through_the_feed() {
        setup();
        let store = Arc::new(InMemoryMovementStore::new());
        let writer = StockService::with_store(store.clone());

        // Recorded before the reader subscribes: must arrive via snapshot.
        writer.stock_in("Boxes", "Small", 40, None, None, None);

        let reader = Arc::new(StockService::with_store(store.clone()));
        let worker = FeedWorker::spawn(reader.clone(), store.subscribe());
        wait_for_feed();
        assert_eq!(reader.current_level(&StockKey::new("Boxes", "Small")), 40);

        // Recorded after: arrives as an incremental append.
        writer.stock_out("Boxes", "Small", 15);
        wait_for_feed();
        assert_eq!(reader.current_level(&StockKey::new("Boxes", "Small")), 25);

        worker.shutdown();
    }

    #[test]
    fn echoed_appends_do_not_double_count_for_the_writer() {
        setup();
        let store = Arc::new(InMemoryMovementStore::new());
        let writer = Arc::new(StockService::with_store(store.clone()));
        let worker = FeedWorker::spawn(writer.clone(), store.subscribe());

        writer.stock_in("Boxes", "Small", 40, None, None, None);
        wait_for_feed();

        assert_eq!(writer.current_level(&StockKey::new("Boxes", "Small")), 40);
        assert_eq!(writer.state().movements.len(), 1);

        worker.shutdown();
    }

    #[test]
    fn catalog_changes_survive_a_feed_snapshot() {
        setup();
        let store = Arc::new(InMemoryMovementStore::new());
        let service = Arc::new(StockService::with_store(store.clone()));
        service.add_catalog_entry(CatalogKind::Item, "Labels", None);

        let worker = FeedWorker::spawn(service.clone(), store.subscribe());
        wait_for_feed();

        // The snapshot replaces the movement log, not the local catalog.
        assert!(service.selectable_items().contains(&"Labels".to_string()));

        worker.shutdown();
    }

    #[test]
    fn rollover_worker_ticks_and_shuts_down_cleanly() {
        setup();
        let store = Arc::new(InMemoryMovementStore::new());
        let service = Arc::new(StockService::with_store(store));

        let worker = RolloverWorker::spawn(service.clone(), Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(40));
        worker.shutdown();

        // Same calendar day: the ticks were no-ops, state untouched.
        assert!(service.state().movements.is_empty());
    }
}
