//! In-memory `MediaServer` for tests
//!
//! Records every call, serves canned state, and can be told to fail or to
//! hold zone queries until released. Enabled by the `test-support` feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Notify, Semaphore};

use crate::client::MediaServer;
use crate::error::{ApiError, Result};
use crate::mcc::McCommand;
use crate::model::{NativeBrowseChild, PlaybackInfo, ServerInfo, Zone};

/// A single recorded call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub args: Vec<String>,
    pub zone: Option<String>,
}

#[derive(Default)]
struct FakeState {
    server_info: Option<ServerInfo>,
    zones: Vec<Zone>,
    playback: HashMap<Option<String>, PlaybackInfo>,
    browse: HashMap<Option<i64>, Vec<NativeBrowseChild>>,
    failure: Option<ApiError>,
    calls: Vec<Call>,
}

/// Fake media server with scripted responses
pub struct FakeMediaServer {
    state: Mutex<FakeState>,
    zone_queries: AtomicUsize,
    gate: Mutex<Option<Arc<Semaphore>>>,
    query_started: Notify,
}

impl Default for FakeMediaServer {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeMediaServer {
    pub fn new() -> Self {
        let state = FakeState {
            server_info: Some(ServerInfo {
                name: "Test Library".to_string(),
                platform: "Linux".to_string(),
                version: "32.0.6".to_string(),
            }),
            ..Default::default()
        };

        Self {
            state: Mutex::new(state),
            zone_queries: AtomicUsize::new(0),
            gate: Mutex::new(None),
            query_started: Notify::new(),
        }
    }

    pub fn with_zones(self, zones: Vec<Zone>) -> Self {
        self.state.lock().zones = zones;
        self
    }

    /// Serve `info` for `zone` (`None` is the active zone)
    pub fn with_playback(self, zone: Option<&str>, info: PlaybackInfo) -> Self {
        self.set_playback(zone, info);
        self
    }

    pub fn with_children(self, node_id: Option<i64>, children: Vec<NativeBrowseChild>) -> Self {
        self.state.lock().browse.insert(node_id, children);
        self
    }

    pub fn set_playback(&self, zone: Option<&str>, info: PlaybackInfo) {
        self.state
            .lock()
            .playback
            .insert(zone.map(str::to_string), info);
    }

    /// Make every subsequent call fail with `error` (or succeed again with `None`)
    pub fn set_failure(&self, error: Option<ApiError>) {
        self.state.lock().failure = error;
    }

    /// All calls recorded so far
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<Call> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    /// Number of `get_zones` calls, one per refresh cycle
    pub fn zone_queries(&self) -> usize {
        self.zone_queries.load(Ordering::SeqCst)
    }

    /// Hold `get_zones` calls until [`release_queries`](Self::release_queries)
    pub fn hold_queries(&self) {
        *self.gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    /// Let `permits` held (or future) `get_zones` calls proceed
    pub fn release_queries(&self, permits: usize) {
        if let Some(gate) = self.gate.lock().as_ref() {
            gate.add_permits(permits);
        }
    }

    /// Resolves once at least `count` `get_zones` calls have started
    pub async fn wait_for_zone_queries(&self, count: usize) {
        loop {
            let started = self.query_started.notified();
            if self.zone_queries() >= count {
                return;
            }
            started.await;
        }
    }

    fn record(&self, method: &'static str, args: Vec<String>, zone: Option<&str>) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(Call {
            method,
            args,
            zone: zone.map(str::to_string),
        });
        match &state.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MediaServer for FakeMediaServer {
    async fn connect(&self) -> Result<()> {
        self.record("connect", vec![], None)
    }

    async fn close(&self) -> Result<()> {
        self.record("close", vec![], None)
    }

    async fn get_server_info(&self) -> Result<ServerInfo> {
        self.record("get_server_info", vec![], None)?;
        self.state
            .lock()
            .server_info
            .clone()
            .ok_or_else(|| ApiError::Protocol("no server info".to_string()))
    }

    async fn get_zones(&self) -> Result<Vec<Zone>> {
        self.zone_queries.fetch_add(1, Ordering::SeqCst);
        self.query_started.notify_waiters();

        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        self.record("get_zones", vec![], None)?;
        Ok(self.state.lock().zones.clone())
    }

    async fn get_playback_info(&self, zone: Option<&str>) -> Result<PlaybackInfo> {
        self.record("get_playback_info", vec![], zone)?;
        self.state
            .lock()
            .playback
            .get(&zone.map(str::to_string))
            .cloned()
            .ok_or_else(|| ApiError::InvalidParameter(format!("unknown zone {:?}", zone)))
    }

    async fn get_active_zone(&self) -> Result<Zone> {
        self.record("get_active_zone", vec![], None)?;
        let state = self.state.lock();
        state
            .zones
            .iter()
            .find(|z| z.active)
            .or_else(|| state.zones.first())
            .cloned()
            .ok_or_else(|| ApiError::Protocol("no zones".to_string()))
    }

    async fn set_active_zone(&self, name: &str) -> Result<()> {
        self.record("set_active_zone", vec![name.to_string()], None)?;
        let mut state = self.state.lock();
        for zone in state.zones.iter_mut() {
            zone.active = zone.name == name;
        }
        Ok(())
    }

    async fn play_pause(&self, zone: Option<&str>) -> Result<()> {
        self.record("play_pause", vec![], zone)
    }

    async fn play(&self, zone: Option<&str>) -> Result<()> {
        self.record("play", vec![], zone)
    }

    async fn pause(&self, zone: Option<&str>) -> Result<()> {
        self.record("pause", vec![], zone)
    }

    async fn stop(&self, zone: Option<&str>) -> Result<()> {
        self.record("stop", vec![], zone)
    }

    async fn next_track(&self, zone: Option<&str>) -> Result<()> {
        self.record("next_track", vec![], zone)
    }

    async fn previous_track(&self, zone: Option<&str>) -> Result<()> {
        self.record("previous_track", vec![], zone)
    }

    async fn media_seek(&self, position_ms: u64, zone: Option<&str>) -> Result<()> {
        self.record("media_seek", vec![position_ms.to_string()], zone)
    }

    async fn volume_up(&self, zone: Option<&str>) -> Result<()> {
        self.record("volume_up", vec![], zone)
    }

    async fn volume_down(&self, zone: Option<&str>) -> Result<()> {
        self.record("volume_down", vec![], zone)
    }

    async fn set_volume_level(&self, volume: f32, zone: Option<&str>) -> Result<()> {
        self.record("set_volume_level", vec![volume.to_string()], zone)
    }

    async fn mute(&self, mute: bool, zone: Option<&str>) -> Result<()> {
        self.record("mute", vec![mute.to_string()], zone)
    }

    async fn set_shuffle(&self, shuffle: bool, zone: Option<&str>) -> Result<()> {
        self.record("set_shuffle", vec![shuffle.to_string()], zone)
    }

    async fn clear_playlist(&self, zone: Option<&str>) -> Result<()> {
        self.record("clear_playlist", vec![], zone)
    }

    async fn play_file(&self, path: &str, zone: Option<&str>) -> Result<()> {
        self.record("play_file", vec![path.to_string()], zone)
    }

    async fn play_playlist(&self, path: &str, zone: Option<&str>) -> Result<()> {
        self.record("play_playlist", vec![path.to_string()], zone)
    }

    async fn play_search(&self, query: &str, zone: Option<&str>) -> Result<()> {
        self.record("play_search", vec![query.to_string()], zone)
    }

    async fn play_item(&self, key: &str, zone: Option<&str>) -> Result<()> {
        self.record("play_item", vec![key.to_string()], zone)
    }

    async fn play_browse_files(&self, node_id: i64, zone: Option<&str>) -> Result<()> {
        self.record("play_browse_files", vec![node_id.to_string()], zone)
    }

    async fn get_browse_children(&self, node_id: Option<i64>) -> Result<Vec<NativeBrowseChild>> {
        let args = node_id.map(|id| vec![id.to_string()]).unwrap_or_default();
        self.record("get_browse_children", args, None)?;
        self.state
            .lock()
            .browse
            .get(&node_id)
            .cloned()
            .ok_or_else(|| ApiError::InvalidParameter(format!("unknown browse node {:?}", node_id)))
    }

    async fn send_mcc(
        &self,
        command: McCommand,
        param: Option<i32>,
        block: bool,
        zone: Option<&str>,
    ) -> Result<()> {
        let mut args = vec![command.code().to_string()];
        args.push(param.map(|p| p.to_string()).unwrap_or_default());
        args.push(block.to_string());
        self.record("send_mcc", args, zone)
    }

    fn make_url(&self, path: &str) -> String {
        format!("http://fake-mcws:52199/MCWS/v1/{}", path.trim_start_matches('/'))
    }
}
