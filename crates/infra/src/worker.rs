//! Background workers: feed pump and calendar-day rollover.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use stockdeck_events::Subscription;

use crate::service::StockService;
use crate::store::FeedMessage;

/// Handle to control and join a background worker.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

/// Drains a feed subscription into the service.
///
/// Snapshots and appends are applied in delivery order; the subscription's
/// initial snapshot therefore lands before any live update.
#[derive(Debug)]
pub struct FeedWorker;

impl FeedWorker {
    pub fn spawn(service: Arc<StockService>, feed: Subscription<FeedMessage>) -> WorkerHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let join = thread::Builder::new()
            .name("stockdeck-feed".to_string())
            .spawn(move || {
                let tick = Duration::from_millis(250);
                loop {
                    // Shutdown check (non-blocking)
                    if shutdown_rx.try_recv().is_ok() {
                        break;
                    }

                    match feed.recv_timeout(tick) {
                        Ok(message) => service.apply_feed(message),
                        Err(mpsc::RecvTimeoutError::Timeout) => continue,
                        Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .expect("failed to spawn feed worker thread");

        WorkerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        }
    }
}

/// Periodically asks the service to check for a calendar-day rollover.
///
/// Runs independently of mutations: acknowledgements expire even on a day
/// with no stock activity at all.
#[derive(Debug)]
pub struct RolloverWorker;

impl RolloverWorker {
    pub fn spawn(service: Arc<StockService>, interval: Duration) -> WorkerHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let join = thread::Builder::new()
            .name("stockdeck-rollover".to_string())
            .spawn(move || {
                loop {
                    match shutdown_rx.recv_timeout(interval) {
                        // Tick: no shutdown requested within the interval.
                        Err(mpsc::RecvTimeoutError::Timeout) => service.roll_day(),
                        Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .expect("failed to spawn rollover worker thread");

        WorkerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        }
    }
}
