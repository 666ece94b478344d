//! Periodic sync refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use flowdeck_store::ProductivityStore;

use crate::event::RuntimeEvent;

/// Advances connected integrations' last sync on a fixed interval.
pub struct SyncRefresher {
    store: Arc<ProductivityStore>,
    period: Duration,
    events: broadcast::Sender<RuntimeEvent>,
    /// Shutdown signal receiver.
    shutdown: watch::Receiver<bool>,
}

impl SyncRefresher {
    pub fn new(
        store: Arc<ProductivityStore>,
        period: Duration,
        events: broadcast::Sender<RuntimeEvent>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            store,
            period,
            events,
            shutdown,
        }
    }

    /// Run the refresh loop until shutdown signal.
    ///
    /// The first refresh happens one full period after start.
    pub async fn run(&mut self) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(
            refresh_interval_ms = self.period.as_millis(),
            "starting sync refresher"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh();
                }
                changed = self.shutdown.changed() => {
                    // a dropped sender means the runtime is gone
                    if changed.is_err() || *self.shutdown.borrow() {
                        debug!("refresher received shutdown signal");
                        break;
                    }
                }
            }
        }

        debug!("sync refresher stopped");
    }

    fn refresh(&self) {
        let snapshot = self.store.refresh_sync();
        let refreshed = snapshot.iter().filter(|i| i.connected).count();
        trace!(refreshed, "sync refresh tick");

        // no receivers is fine
        let _ = self.events.send(RuntimeEvent::SyncRefreshed { refreshed });
    }
}
