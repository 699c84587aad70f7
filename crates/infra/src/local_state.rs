//! Local full-state persistence (the no-subscription backend).
//!
//! The entire provider state is serialized as one JSON document at a fixed
//! path under the OS data directory — the moral equivalent of a single
//! storage key. Loads fall back to a fixed default dataset when the file is
//! missing or unreadable; saves are best-effort.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Duration, Utc};

use stockdeck_core::EventId;
use stockdeck_inventory::{Catalog, Direction, InventoryState, StockMovement};

const STATE_FILE: &str = "state.json";

/// Synchronous load/save of the full serialized state.
#[derive(Debug, Clone)]
pub struct LocalStateStore {
    path: PathBuf,
}

impl LocalStateStore {
    /// Store at the default location: `{data_dir}/stockdeck/state.json`,
    /// overridable via `STOCKDECK_STATE_DIR`.
    pub fn new() -> anyhow::Result<Self> {
        let dir = state_dir()?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create state directory at {dir:?}"))?;
        Ok(Self {
            path: dir.join(STATE_FILE),
        })
    }

    /// Store at an explicit file path (tests, demos).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted state. A missing file yields the default dataset; a
    /// corrupt file is logged and also yields the default dataset.
    pub fn load(&self) -> InventoryState {
        match self.try_load() {
            Ok(Some(state)) => state,
            Ok(None) => default_state(),
            Err(err) => {
                tracing::warn!(
                    error = ?err,
                    path = ?self.path,
                    "failed to load persisted state; falling back to the default dataset"
                );
                default_state()
            }
        }
    }

    /// Persist state, best-effort: failures are logged and swallowed.
    pub fn save(&self, state: &InventoryState) {
        if let Err(err) = self.try_save(state) {
            tracing::warn!(error = ?err, path = ?self.path, "failed to persist state");
        }
    }

    fn try_load(&self) -> anyhow::Result<Option<InventoryState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read state file at {:?}", self.path))?;
        let state = serde_json::from_str(&raw).context("failed to parse persisted state")?;
        Ok(Some(state))
    }

    fn try_save(&self, state: &InventoryState) -> anyhow::Result<()> {
        let payload =
            serde_json::to_string_pretty(state).context("failed to serialize state")?;
        std::fs::write(&self.path, payload)
            .with_context(|| format!("failed to write state file at {:?}", self.path))?;
        Ok(())
    }
}

/// Resolve the state directory: `STOCKDECK_STATE_DIR` when set, otherwise
/// `{data_dir}/stockdeck`.
fn state_dir() -> anyhow::Result<PathBuf> {
    if let Ok(dir) = std::env::var("STOCKDECK_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory")?;

    Ok(base.join("stockdeck"))
}

fn seed_movement(
    item: &str,
    item_type: &str,
    qty: u32,
    direction: Direction,
    days_ago: i64,
    source: Option<&str>,
    price: Option<f64>,
) -> StockMovement {
    StockMovement {
        id: EventId::new(),
        item: item.to_string(),
        item_type: item_type.to_string(),
        qty,
        direction,
        recorded_at: Utc::now() - Duration::days(days_ago),
        source: source.map(str::to_owned),
        price,
        invoice: None,
    }
}

/// The fixed dataset a fresh (or unreadable) local state falls back to.
pub fn default_state() -> InventoryState {
    let mut catalog = Catalog::new();
    // Names are non-blank literals; these adds cannot fail.
    for (item, types) in [
        ("Boxes", &["Small", "Medium", "Large"][..]),
        ("Tapes", &["Clear", "Brown"][..]),
        ("Gloves", &["Latex", "Nitrile"][..]),
    ] {
        for item_type in types {
            let _ = catalog.add_type(item, item_type);
        }
    }
    for source in ["Warehouse", "Supplier"] {
        let _ = catalog.add_source(source);
    }

    InventoryState {
        movements: vec![
            seed_movement("Boxes", "Small", 20, Direction::In, 5, Some("Warehouse"), Some(100.0)),
            seed_movement("Boxes", "Small", 10, Direction::Out, 4, None, None),
            seed_movement("Tapes", "Clear", 10, Direction::In, 3, Some("Supplier"), Some(50.0)),
            seed_movement("Gloves", "Latex", 10, Direction::Out, 2, None, None),
        ],
        catalog,
        notifications: Vec::new(),
        messages: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips_the_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStateStore::with_path(dir.path().join("state.json"));

        let state = default_state();
        store.save(&state);

        assert_eq!(store.load(), state);
    }

    #[test]
    fn missing_file_falls_back_to_the_default_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStateStore::with_path(dir.path().join("state.json"));

        let state = store.load();
        assert_eq!(state.movements.len(), 4);
        assert!(state.catalog.has_source("Warehouse"));
    }

    #[test]
    fn corrupt_file_falls_back_to_the_default_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = LocalStateStore::with_path(path);
        assert_eq!(store.load().movements.len(), 4);
    }

    #[test]
    fn save_to_an_unwritable_path_is_swallowed() {
        let store = LocalStateStore::with_path("/nonexistent-dir/state.json");
        // Must not panic; the failure is logged and discarded.
        store.save(&default_state());
    }
}
