//! Property tests for the aggregator's derivation invariants.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;

use stockdeck_inventory::{
    CatalogKind, Direction, InventoryAggregator, RecordMovement, StockKey, StockMovement,
};

const ITEMS: [&str; 3] = ["Boxes", "Tapes", "Gloves"];
const TYPES: [&str; 3] = ["Small", "Large", "Clear"];

#[derive(Debug, Clone)]
enum Op {
    Record {
        item: usize,
        item_type: usize,
        qty: i64,
        out: bool,
    },
    AddItem(usize),
    RemoveItem(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ITEMS.len(), 0..TYPES.len(), -10i64..100, any::<bool>()).prop_map(
            |(item, item_type, qty, out)| Op::Record {
                item,
                item_type,
                qty,
                out,
            }
        ),
        (0..ITEMS.len()).prop_map(Op::AddItem),
        (0..ITEMS.len()).prop_map(Op::RemoveItem),
    ]
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 14).expect("valid date")
}

fn apply(aggregator: &mut InventoryAggregator, op: &Op) {
    match op {
        Op::Record {
            item,
            item_type,
            qty,
            out,
        } => {
            let _ = aggregator.record_movement(RecordMovement {
                item: ITEMS[*item].to_string(),
                item_type: TYPES[*item_type].to_string(),
                qty: *qty,
                direction: if *out { Direction::Out } else { Direction::In },
                recorded_at: Utc::now(),
                source: None,
                price: None,
                invoice: None,
            });
        }
        Op::AddItem(i) => {
            let _ = aggregator.add_catalog_entry(CatalogKind::Item, ITEMS[*i], None);
        }
        Op::RemoveItem(i) => {
            let _ = aggregator.remove_catalog_entry(CatalogKind::Item, ITEMS[*i], None);
        }
    }
}

fn recomputed_level(aggregator: &InventoryAggregator, key: &StockKey) -> u64 {
    let net: i64 = aggregator
        .movements()
        .iter()
        .filter(|m| m.matches(key))
        .map(StockMovement::signed_delta)
        .sum();
    net.max(0) as u64
}

proptest! {
    /// Recomputing a level from scratch always matches the exposed value.
    #[test]
    fn exposed_levels_equal_recomputation(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut aggregator = InventoryAggregator::new(today());
        for op in &ops {
            apply(&mut aggregator, op);
        }

        for item in ITEMS {
            for item_type in TYPES {
                let key = StockKey::new(item, item_type);
                prop_assert_eq!(
                    aggregator.current_level(&key),
                    recomputed_level(&aggregator, &key)
                );
            }
        }
    }

    /// With no acknowledgements in play, a message exists iff the key appears
    /// in the log with a floored level of zero — after every single step.
    #[test]
    fn message_set_matches_levels_at_every_step(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut aggregator = InventoryAggregator::new(today());
        for op in &ops {
            apply(&mut aggregator, op);

            for (key, level) in aggregator.levels() {
                prop_assert_eq!(aggregator.has_message(&key), level == 0);
            }
        }
    }

    /// Catalog operations never touch the log; only valid records extend it.
    #[test]
    fn log_grows_only_through_valid_records(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut aggregator = InventoryAggregator::new(today());
        let mut expected_len = 0usize;

        for op in &ops {
            apply(&mut aggregator, op);
            if let Op::Record { qty, .. } = op {
                if *qty > 0 {
                    expected_len += 1;
                }
            }
            prop_assert_eq!(aggregator.movements().len(), expected_len);
        }
    }

    /// Every item observed in the log stays selectable unless excluded.
    #[test]
    fn observed_items_are_selectable_unless_excluded(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut aggregator = InventoryAggregator::new(today());
        let mut excluded: std::collections::BTreeSet<&str> = Default::default();

        for op in &ops {
            apply(&mut aggregator, op);
            match op {
                Op::AddItem(i) => {
                    excluded.remove(ITEMS[*i]);
                }
                Op::RemoveItem(i) => {
                    excluded.insert(ITEMS[*i]);
                }
                Op::Record { .. } => {}
            }
        }

        let selectable = aggregator.selectable_items();
        for m in aggregator.movements() {
            prop_assert_eq!(
                selectable.contains(&m.item),
                !excluded.contains(m.item.as_str()),
                "item {}", m.item
            );
        }
    }
}
