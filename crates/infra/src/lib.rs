//! Infrastructure layer: persistence collaborators, the state provider, and
//! background workers.

pub mod local_state;
pub mod service;
pub mod store;
pub mod worker;

mod integration_tests;

pub use local_state::{LocalStateStore, default_state};
pub use service::StockService;
pub use store::{FeedMessage, InMemoryMovementStore, MovementStore, StoreError, StoredMovement};
pub use worker::{FeedWorker, RolloverWorker, WorkerHandle};
