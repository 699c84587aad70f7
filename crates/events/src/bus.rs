//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus is the push channel between the movement store and its consumers
//! (the dashboard state provider, background workers). It is intentionally
//! lightweight:
//!
//! - **Transport-agnostic**: in-memory channels here, a document store's
//!   change feed behind the same trait in a real deployment.
//! - **Broadcast semantics**: every subscriber gets a copy of every message.
//! - **No persistence**: the bus distributes; the movement store is the
//!   source of truth. A consumer that misses messages re-syncs from the next
//!   full snapshot.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to a message stream.
///
/// Wraps the receiving half of a channel; designed for single-threaded
/// consumption (one subscription per consumer loop).
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic pub/sub bus.
///
/// Publication is best-effort fan-out; subscribers must tolerate duplicate
/// delivery (idempotent application) because an upstream store may republish
/// after partial failures.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
