//! `stockdeck-events` — event trait and pub/sub mechanics.
//!
//! The types here are transport-agnostic: the bus makes no storage
//! assumptions, and the in-memory implementation exists for tests, the local
//! backend, and any single-process deployment.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
