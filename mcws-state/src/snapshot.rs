//! Immutable point-in-time capture of server and zone state

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mcws_api::{PlaybackInfo, ServerInfo, Zone};

/// Key for per-zone playback records
///
/// `Default` stands for "no zone targeted", i.e. whatever zone the server
/// considers active.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKey {
    Default,
    Named(String),
}

impl ZoneKey {
    pub fn from_zone(zone: Option<&str>) -> Self {
        match zone {
            Some(name) => ZoneKey::Named(name.to_string()),
            None => ZoneKey::Default,
        }
    }

    /// Zone argument to pass to the media server
    pub fn as_zone(&self) -> Option<&str> {
        match self {
            ZoneKey::Default => None,
            ZoneKey::Named(name) => Some(name.as_str()),
        }
    }
}

impl fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneKey::Default => write!(f, "<active zone>"),
            ZoneKey::Named(name) => write!(f, "{}", name),
        }
    }
}

/// The latest known server state
///
/// Built once per refresh cycle and never modified afterwards; the
/// coordinator replaces the whole value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    server_info: ServerInfo,
    zones: Vec<Zone>,
    playback: HashMap<ZoneKey, PlaybackInfo>,
    updated_at: HashMap<ZoneKey, DateTime<Utc>>,
    captured_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// A snapshot with nothing fetched yet
    pub fn empty(server_info: ServerInfo) -> Self {
        Self {
            server_info,
            zones: Vec::new(),
            playback: HashMap::new(),
            updated_at: HashMap::new(),
            captured_at: None,
        }
    }

    pub fn builder(server_info: ServerInfo) -> SnapshotBuilder {
        SnapshotBuilder {
            snapshot: Self::empty(server_info),
        }
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn active_zone(&self) -> Option<&Zone> {
        self.zones.iter().find(|z| z.active)
    }

    pub fn zone_by_name(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name == name)
    }

    /// Playback record for `zone`, `None` if it has not been fetched
    pub fn playback_info(&self, zone: Option<&str>) -> Option<&PlaybackInfo> {
        self.playback.get(&ZoneKey::from_zone(zone))
    }

    /// When the playback record for `zone` was captured
    pub fn position_updated_at(&self, zone: Option<&str>) -> Option<DateTime<Utc>> {
        self.updated_at.get(&ZoneKey::from_zone(zone)).copied()
    }

    /// When the cycle that produced this snapshot finished; `None` before the first refresh
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        self.captured_at
    }

    pub fn playback_count(&self) -> usize {
        self.playback.len()
    }
}

/// Assembles a [`Snapshot`]; used by refresh cycles and tests
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    pub fn zones(mut self, zones: Vec<Zone>) -> Self {
        self.snapshot.zones = zones;
        self
    }

    /// Record playback for a zone; a second record for the same key replaces the first
    pub fn playback(mut self, key: ZoneKey, info: PlaybackInfo, at: DateTime<Utc>) -> Self {
        self.snapshot.updated_at.insert(key.clone(), at);
        self.snapshot.playback.insert(key, info);
        self
    }

    pub fn captured_at(mut self, at: DateTime<Utc>) -> Self {
        self.snapshot.captured_at = Some(at);
        self
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}
