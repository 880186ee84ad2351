//! Background Expiry Sweeper
//!
//! This module implements a background task that periodically removes expired
//! records from the store. This is "active expiry", as opposed to the lazy
//! removal that happens when an expired short code is requested.
//!
//! ## Why Do We Need This?
//!
//! Lazy expiry only fires when someone follows an expired link. A link that is
//! never visited again would otherwise stay in memory forever.
//!
//! ## Design
//!
//! The sweeper runs as a Tokio task and:
//! 1. Sleeps for the configured interval (default: 1 hour)
//! 2. Calls [`MappingStore::sweep_expired`]
//! 3. Logs how many records were removed

use crate::storage::MappingStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, trace};

/// Configuration for the expiry sweeper.
#[derive(Debug, Clone)]
pub struct ExpiryConfig {
    /// Interval between sweeps (default: 1 hour)
    pub interval: Duration,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60 * 60),
        }
    }
}

/// A handle to the running expiry sweeper.
///
/// When this handle is dropped, the sweeper task will be stopped.
#[derive(Debug)]
pub struct ExpirySweeper {
    /// Sender to signal shutdown
    shutdown_tx: watch::Sender<bool>,
}

impl ExpirySweeper {
    /// Starts the expiry sweeper as a background task.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use shorty::storage::{ExpiryConfig, ExpirySweeper, MappingStore};
    /// use std::sync::Arc;
    ///
    /// let store = Arc::new(MappingStore::new());
    /// let sweeper = ExpirySweeper::start(store, ExpiryConfig::default());
    ///
    /// // Sweeper runs in the background...
    ///
    /// // Dropping the sweeper will stop it
    /// drop(sweeper);
    /// ```
    pub fn start(store: Arc<MappingStore>, config: ExpiryConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            interval_secs = config.interval.as_secs(),
            "Background expiry sweeper started"
        );
        tokio::spawn(sweeper_loop(store, config, shutdown_rx));

        Self { shutdown_tx }
    }

    /// Stops the expiry sweeper.
    ///
    /// This is called automatically when the handle is dropped.
    pub fn stop(&self) {
        if self.shutdown_tx.send(true).is_ok() {
            info!("Background expiry sweeper stopped");
        }
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The main sweeper loop.
async fn sweeper_loop(
    store: Arc<MappingStore>,
    config: ExpiryConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(config.interval) => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("Expiry sweeper received shutdown signal");
                    return;
                }
            }
        }

        let removed = store.sweep_expired();

        if removed > 0 {
            info!(
                removed = removed,
                records_remaining = store.len(),
                "Cleanup of expired URLs completed"
            );
        } else {
            trace!("Expiry sweep found nothing to remove");
        }
    }
}

/// Starts the expiry sweeper with the given interval.
pub fn start_expiry_sweeper(store: Arc<MappingStore>, interval: Duration) -> ExpirySweeper {
    ExpirySweeper::start(store, ExpiryConfig { interval })
}
