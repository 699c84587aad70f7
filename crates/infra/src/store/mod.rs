//! Append-only movement store boundary.
//!
//! The store is treated as a black box offering exactly two operations:
//! append a movement, and subscribe to the ordered movement feed. Nothing in
//! this crate depends on a concrete wire protocol — the in-memory
//! implementation stands in for any document store honoring the contract.

pub mod feed;
pub mod in_memory;
pub mod r#trait;

pub use feed::{FeedMessage, StoreError, StoredMovement};
pub use in_memory::InMemoryMovementStore;
pub use r#trait::MovementStore;
