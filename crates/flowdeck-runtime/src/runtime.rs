//! Dashboard runtime: owns the store for its lifetime and drives the timers.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use flowdeck_models::IntegrationId;
use flowdeck_store::{IntegrationSnapshot, ProductivityStore, TaskSnapshot};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::event::RuntimeEvent;
use crate::refresher::SyncRefresher;

/// Transient UI flags. None of these feed back into the store.
#[derive(Debug, Default)]
struct Flags {
    loading: AtomicBool,
    analyzing: AtomicBool,
    /// Never held across an await.
    connecting: Mutex<HashSet<IntegrationId>>,
}

/// Marks an id as connecting for as long as it lives.
///
/// Dropping the connect future mid-delay drops the guard too, so the id
/// never stays marked.
struct ConnectingGuard {
    flags: Arc<Flags>,
    id: IntegrationId,
}

impl ConnectingGuard {
    /// Returns `None` if `id` is already connecting.
    fn acquire(flags: &Arc<Flags>, id: &IntegrationId) -> Option<Self> {
        if !lock(&flags.connecting).insert(id.clone()) {
            return None;
        }
        Some(Self {
            flags: Arc::clone(flags),
            id: id.clone(),
        })
    }
}

impl Drop for ConnectingGuard {
    fn drop(&mut self) {
        lock(&self.flags.connecting).remove(&self.id);
    }
}

/// Main runtime combining the store, the sync refresher and the simulated
/// delays.
///
/// The store is created with the runtime and is reachable through
/// [`store`](Self::store) only between [`start`](Self::start) and
/// [`shutdown`](Self::shutdown).
pub struct DashboardRuntime {
    config: RuntimeConfig,
    store: Arc<ProductivityStore>,
    flags: Arc<Flags>,
    /// Event broadcast channel.
    event_tx: broadcast::Sender<RuntimeEvent>,
    /// Refresher and loading timer.
    handles: Vec<JoinHandle<()>>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver (for cloning to timers).
    shutdown_rx: watch::Receiver<bool>,
    /// Whether the runtime has been started.
    started: bool,
}

impl DashboardRuntime {
    /// Create a runtime with a freshly seeded store.
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_store(config, ProductivityStore::new())
    }

    /// Create a runtime around a provided store.
    pub fn with_store(config: RuntimeConfig, store: ProductivityStore) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            config,
            store: Arc::new(store),
            flags: Arc::new(Flags::default()),
            event_tx,
            handles: Vec::new(),
            shutdown_tx,
            shutdown_rx,
            started: false,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Start the runtime: spawns the sync refresher and the loading timer.
    pub async fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(RuntimeError::AlreadyStarted);
        }
        if *self.shutdown_rx.borrow() {
            // watch channels cannot be rewound, so a stopped runtime stays
            // stopped
            return Err(RuntimeError::Shutdown("runtime was already shut down".to_string()));
        }

        info!("starting dashboard runtime");

        let store = Arc::clone(&self.store);
        let period = self.config.refresh_interval;
        let events = self.event_tx.clone();
        let shutdown_rx = self.shutdown_rx.clone();
        self.handles.push(tokio::spawn(async move {
            let mut refresher = SyncRefresher::new(store, period, events, shutdown_rx);
            refresher.run().await;
        }));

        self.flags.loading.store(true, Ordering::SeqCst);
        let flags = Arc::clone(&self.flags);
        let events = self.event_tx.clone();
        let delay = self.config.loading_delay;
        let shutdown_rx = self.shutdown_rx.clone();
        self.handles.push(tokio::spawn(async move {
            if sleep_unless_shutdown(delay, shutdown_rx).await {
                flags.loading.store(false, Ordering::SeqCst);
                let _ = events.send(RuntimeEvent::LoadingFinished);
                debug!("loading finished");
            }
        }));

        self.started = true;
        debug!("dashboard runtime started");

        Ok(())
    }

    /// Stop the runtime: cancels every timer and waits for them to finish.
    pub async fn shutdown(&mut self) -> Result<()> {
        if !self.started {
            return Err(RuntimeError::NotStarted);
        }

        info!("shutting down dashboard runtime");

        self.shutdown_tx.send(true).map_err(|e| {
            RuntimeError::Shutdown(format!("failed to send shutdown signal: {}", e))
        })?;

        for handle in self.handles.drain(..) {
            handle
                .await
                .map_err(|e| RuntimeError::Shutdown(format!("timer task panicked: {}", e)))?;
        }

        self.flags.loading.store(false, Ordering::SeqCst);
        self.flags.analyzing.store(false, Ordering::SeqCst);
        self.started = false;

        info!("dashboard runtime stopped");

        Ok(())
    }

    /// Check if the runtime has been started.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The shared store.
    ///
    /// # Panics
    ///
    /// Panics if the runtime is not running. Reaching for the store outside
    /// the runtime's lifetime is a wiring bug, not a recoverable condition.
    pub fn store(&self) -> Arc<ProductivityStore> {
        match self.try_store() {
            Ok(store) => store,
            Err(_) => panic!("productivity store accessed while the dashboard runtime is not running"),
        }
    }

    /// The shared store, or `NotStarted` outside the runtime's lifetime.
    pub fn try_store(&self) -> Result<Arc<ProductivityStore>> {
        if !self.started {
            return Err(RuntimeError::NotStarted);
        }
        Ok(Arc::clone(&self.store))
    }

    /// Subscribe to runtime events.
    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.event_tx.subscribe()
    }

    /// True until the loading delay after start has elapsed.
    pub fn is_loading(&self) -> bool {
        self.flags.loading.load(Ordering::SeqCst)
    }

    /// True while the analysis period after generating suggestions runs.
    pub fn is_analyzing(&self) -> bool {
        self.flags.analyzing.load(Ordering::SeqCst)
    }

    /// True while a simulated connect for `id` is in flight.
    pub fn is_connecting(&self, id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        lock(&self.flags.connecting).iter().any(|c| c == id)
    }

    /// Connect an integration after the simulated authentication delay.
    ///
    /// A second connect for an id that is already in flight returns the
    /// current integrations without starting another delay. Unknown ids go
    /// through the delay and then no-op in the store.
    pub async fn connect(&self, id: impl Into<IntegrationId>) -> Result<IntegrationSnapshot> {
        let store = self.try_store()?;
        let id = id.into();

        let Some(connecting) = ConnectingGuard::acquire(&self.flags, &id) else {
            debug!(integration = %id, "connect already in flight");
            return Ok(store.integrations());
        };

        let _ = self.event_tx.send(RuntimeEvent::ConnectStarted {
            integration: id.clone(),
        });
        debug!(integration = %id, delay_ms = self.config.connect_delay.as_millis(), "connecting");

        let completed =
            sleep_unless_shutdown(self.config.connect_delay, self.shutdown_rx.clone()).await;

        drop(connecting);

        if !completed {
            warn!(integration = %id, "connect cancelled by shutdown");
            return Err(RuntimeError::Cancelled(format!("connect {}", id)));
        }

        let snapshot = store.connect(&id);
        let _ = self.event_tx.send(RuntimeEvent::ConnectFinished { integration: id });
        Ok(snapshot)
    }

    /// Disconnect an integration. Takes effect immediately.
    pub fn disconnect(&self, id: impl AsRef<str>) -> Result<IntegrationSnapshot> {
        Ok(self.try_store()?.disconnect(id))
    }

    /// Generate task suggestions and hold the analyzing flag for the
    /// analysis delay.
    ///
    /// While a previous analysis period is still running this returns the
    /// current tasks unchanged.
    pub fn generate_insights(&self) -> Result<TaskSnapshot> {
        let store = self.try_store()?;

        if self.flags.analyzing.swap(true, Ordering::SeqCst) {
            debug!("analysis already running");
            return Ok(store.tasks());
        }

        let snapshot = store.generate_suggestions();

        let flags = Arc::clone(&self.flags);
        let events = self.event_tx.clone();
        let delay = self.config.analysis_delay;
        let shutdown_rx = self.shutdown_rx.clone();
        tokio::spawn(async move {
            let finished = sleep_unless_shutdown(delay, shutdown_rx).await;
            flags.analyzing.store(false, Ordering::SeqCst);
            if finished {
                let _ = events.send(RuntimeEvent::AnalysisFinished);
            }
        });

        Ok(snapshot)
    }
}

impl Drop for DashboardRuntime {
    fn drop(&mut self) {
        // Send shutdown signal if still running
        if self.started {
            let _ = self.shutdown_tx.send(true);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sleeps for `delay`, returning false if shutdown was signalled first.
async fn sleep_unless_shutdown(delay: Duration, mut shutdown: watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return false;
    }
    tokio::select! {
        _ = tokio::time::sleep(delay) => true,
        _ = shutdown.wait_for(|stopped| *stopped) => false,
    }
}
