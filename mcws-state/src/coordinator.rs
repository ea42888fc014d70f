//! Polling coordinator
//!
//! The coordinator owns the single [`Snapshot`] of a media server connection.
//! A background worker refreshes it every `scan_interval` and whenever a
//! command asks for it through [`Coordinator::request_refresh`].
//!
//! Refresh cycles never overlap: the worker serves both the timer and manual
//! requests, and direct [`Coordinator::refresh`] calls take the same cycle
//! lock. Manual requests coalesce; while one is pending further requests are
//! no-ops, so a request that lands mid-cycle produces exactly one extra cycle.
//!
//! ```rust,ignore
//! let coordinator = Coordinator::connect(client, CoordinatorConfig::default()).await?;
//! coordinator.start();
//!
//! let mut watcher = coordinator.subscribe();
//! while watcher.changed().await.is_ok() {
//!     let snapshot = watcher.current();
//!     println!("{} zones", snapshot.zones().len());
//! }
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use mcws_api::MediaServer;

use crate::config::CoordinatorConfig;
use crate::error::{Result, StateError};
use crate::snapshot::{Snapshot, ZoneKey};

/// Callback invoked with every newly published snapshot
///
/// Listeners run inline after the swap and must not register or remove
/// listeners themselves.
pub type Listener = Box<dyn Fn(&Arc<Snapshot>) + Send + Sync>;

/// Handle returned by [`Coordinator::add_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Receives every snapshot the coordinator publishes
pub struct SnapshotWatcher {
    receiver: watch::Receiver<Arc<Snapshot>>,
}

impl SnapshotWatcher {
    /// Wait for the next published snapshot
    pub async fn changed(&mut self) -> std::result::Result<(), watch::error::RecvError> {
        self.receiver.changed().await
    }

    /// The most recently published snapshot
    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.receiver.borrow())
    }

    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }
}

/// Polls a media server and publishes immutable snapshots
pub struct Coordinator {
    client: Arc<dyn MediaServer>,
    config: CoordinatorConfig,

    /// Current snapshot; `send_replace` is the only writer
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    listeners: RwLock<Vec<(ListenerId, Listener)>>,
    next_listener_id: AtomicU64,

    /// Held for the whole of a refresh cycle
    cycle_lock: tokio::sync::Mutex<()>,
    refresh_requested: AtomicBool,
    refresh_signal: Notify,

    shutdown_signal: Notify,
    shut_down: AtomicBool,
    worker: Mutex<Option<JoinHandle<()>>>,

    last_update_success: AtomicBool,
    last_error: Mutex<Option<String>>,
    refresh_count: AtomicU64,
    scheduled_refreshes: AtomicU64,
}

impl Coordinator {
    /// Connect to the server, fetch its identity and run the first refresh
    ///
    /// If the first refresh fails the client is closed again and the error
    /// is returned, so the host can retry setup later.
    pub async fn connect(
        client: Arc<dyn MediaServer>,
        config: CoordinatorConfig,
    ) -> Result<Arc<Self>> {
        config.validate()?;

        client.connect().await?;
        let server_info = match client.get_server_info().await {
            Ok(info) => info,
            Err(err) => {
                let _ = client.close().await;
                return Err(err.into());
            }
        };

        info!(
            server = %server_info.name,
            platform = %server_info.platform,
            version = %server_info.version,
            "Connected to media server"
        );

        let coordinator = Arc::new(Self::with_snapshot(
            client,
            config,
            Snapshot::empty(server_info),
        ));

        if let Err(err) = coordinator.refresh().await {
            let _ = coordinator.client.close().await;
            return Err(err);
        }

        Ok(coordinator)
    }

    /// Build a coordinator around an existing snapshot without contacting the server
    pub fn with_snapshot(
        client: Arc<dyn MediaServer>,
        config: CoordinatorConfig,
        snapshot: Snapshot,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(snapshot));

        Self {
            client,
            config,
            snapshot_tx,
            listeners: RwLock::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
            cycle_lock: tokio::sync::Mutex::new(()),
            refresh_requested: AtomicBool::new(false),
            refresh_signal: Notify::new(),
            shutdown_signal: Notify::new(),
            shut_down: AtomicBool::new(false),
            worker: Mutex::new(None),
            last_update_success: AtomicBool::new(true),
            last_error: Mutex::new(None),
            refresh_count: AtomicU64::new(0),
            scheduled_refreshes: AtomicU64::new(0),
        }
    }

    pub fn client(&self) -> &Arc<dyn MediaServer> {
        &self.client
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Spawn the polling worker; calling it again is a no-op
    pub fn start(self: &Arc<Self>) {
        let mut worker = self.worker.lock();
        if worker.is_some() || self.shut_down.load(Ordering::SeqCst) {
            return;
        }

        let coordinator = Arc::clone(self);
        *worker = Some(tokio::spawn(async move {
            coordinator.polling_loop().await;
        }));
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    async fn polling_loop(self: Arc<Self>) {
        let period = self.config.scan_interval;
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(interval = ?period, "Polling worker started");

        loop {
            if self.shut_down.load(Ordering::SeqCst) {
                break;
            }

            tokio::select! {
                biased;
                _ = self.shutdown_signal.notified() => break,
                _ = self.refresh_signal.notified() => {
                    self.refresh_requested.store(false, Ordering::SeqCst);
                    trace!("Running requested refresh");
                }
                _ = interval.tick() => {
                    trace!("Running scheduled refresh");
                }
            }

            // Failures are logged and recorded inside the cycle
            let _ = self.refresh().await;
        }

        debug!("Polling worker stopped");
    }

    /// Run one refresh cycle now
    ///
    /// Waits for any cycle already in progress. On failure the previous
    /// snapshot stays current and listeners are not called.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>> {
        let _cycle = self.cycle_lock.lock().await;

        if self.shut_down.load(Ordering::SeqCst) {
            return Err(StateError::ShutDown);
        }

        self.refresh_count.fetch_add(1, Ordering::SeqCst);

        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.snapshot_tx.send_replace(Arc::clone(&snapshot));
                self.last_update_success.store(true, Ordering::SeqCst);
                *self.last_error.lock() = None;

                for (_, listener) in self.listeners.read().iter() {
                    listener(&snapshot);
                }

                debug!(
                    zones = snapshot.zones().len(),
                    playback = snapshot.playback_count(),
                    "Published snapshot"
                );
                Ok(snapshot)
            }
            Err(err) => {
                warn!(error = %err, "Refresh failed, keeping previous snapshot");
                self.last_update_success.store(false, Ordering::SeqCst);
                *self.last_error.lock() = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    async fn fetch_snapshot(&self) -> mcws_api::Result<Snapshot> {
        let server_info = self.current().server_info().clone();
        let zones = self.client.get_zones().await?;

        let mut builder = Snapshot::builder(server_info).zones(zones);
        for key in self.targets() {
            let info = self.client.get_playback_info(key.as_zone()).await?;
            builder = builder.playback(key, info, Utc::now());
        }

        Ok(builder.captured_at(Utc::now()).build())
    }

    fn targets(&self) -> Vec<ZoneKey> {
        if self.config.zones.is_empty() {
            vec![ZoneKey::Default]
        } else {
            self.config
                .zones
                .iter()
                .map(|z| ZoneKey::Named(z.clone()))
                .collect()
        }
    }

    /// Ask the worker for a refresh without waiting for it
    ///
    /// Returns `false` when a request is already pending, in which case this
    /// call is absorbed by it.
    pub fn request_refresh(&self) -> bool {
        if self.refresh_requested.swap(true, Ordering::SeqCst) {
            trace!("Refresh already pending");
            return false;
        }

        self.scheduled_refreshes.fetch_add(1, Ordering::SeqCst);
        self.refresh_signal.notify_one();
        true
    }

    pub fn refresh_pending(&self) -> bool {
        self.refresh_requested.load(Ordering::SeqCst)
    }

    /// The current snapshot
    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot_tx.borrow())
    }

    pub fn subscribe(&self) -> SnapshotWatcher {
        SnapshotWatcher {
            receiver: self.snapshot_tx.subscribe(),
        }
    }

    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Arc<Snapshot>) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::SeqCst));
        self.listeners.write().push((id, Box::new(listener)));
        id
    }

    /// Returns whether a listener was removed
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn last_update_success(&self) -> bool {
        self.last_update_success.load(Ordering::SeqCst)
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    /// Number of refresh cycles started
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count.load(Ordering::SeqCst)
    }

    /// Number of manual refresh requests that were queued rather than absorbed
    pub fn scheduled_refreshes(&self) -> u64 {
        self.scheduled_refreshes.load(Ordering::SeqCst)
    }

    /// Stop polling and close the client
    ///
    /// A cycle already in flight is allowed to finish first. Calling this
    /// more than once is harmless.
    pub async fn shutdown(&self) -> Result<()> {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        self.shutdown_signal.notify_one();

        let worker = self.worker.lock().take();
        if let Some(handle) = worker {
            if let Err(err) = handle.await {
                warn!(error = %err, "Polling worker ended abnormally");
            }
        }

        // Wait out a direct refresh() that may still be running
        drop(self.cycle_lock.lock().await);

        self.client.close().await?;
        info!("Coordinator shut down");
        Ok(())
    }
}
