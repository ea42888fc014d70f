//! Entry lifecycle
//!
//! The host owns one [`EntityRegistry`] and hands it every configured entry.
//! Setting up an entry connects a coordinator, starts polling and creates the
//! entry's players; unloading shuts the coordinator down again.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use mcws_api::MediaServer;
use mcws_state::Coordinator;

use crate::config::EntryConfig;
use crate::device::DeviceInfo;
use crate::error::{Result, SdkError};
use crate::player::MediaPlayer;

/// A set-up entry
pub struct LoadedEntry {
    pub entry_id: String,
    pub config: EntryConfig,
    pub coordinator: Arc<Coordinator>,
    pub players: Vec<Arc<MediaPlayer>>,
}

#[derive(Default)]
pub struct EntityRegistry {
    entries: RwLock<HashMap<String, Arc<LoadedEntry>>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the entry already configured for `host`
    pub fn find_entry_for_host(&self, host: &str) -> Option<String> {
        self.entries
            .read()
            .values()
            .find(|entry| entry.config.host.eq_ignore_ascii_case(host))
            .map(|entry| entry.entry_id.clone())
    }

    pub fn entry(&self, entry_id: &str) -> Option<Arc<LoadedEntry>> {
        self.entries.read().get(entry_id).cloned()
    }

    pub fn players(&self, entry_id: &str) -> Vec<Arc<MediaPlayer>> {
        self.entry(entry_id)
            .map(|entry| entry.players.clone())
            .unwrap_or_default()
    }

    /// Look a player up by unique id across all entries
    pub fn player(&self, unique_id: &str) -> Option<Arc<MediaPlayer>> {
        self.entries
            .read()
            .values()
            .flat_map(|entry| entry.players.iter())
            .find(|player| player.unique_id() == unique_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn check_unique(&self, entry_id: &str, host: &str) -> Result<()> {
        check_unique_in(&self.entries.read(), entry_id, host)
    }

    /// Connect `client`, start polling and register the entry's players
    ///
    /// With zones configured there is one player per zone, otherwise a single
    /// player for the server's active zone. A host can only be set up once.
    pub async fn setup_entry(
        &self,
        entry_id: &str,
        config: EntryConfig,
        client: Arc<dyn MediaServer>,
    ) -> Result<Arc<LoadedEntry>> {
        config.validate()?;
        self.check_unique(entry_id, &config.host)?;

        let coordinator = Coordinator::connect(client, config.coordinator_config()).await?;
        let players = build_players(entry_id, &config, &coordinator);

        let entry = Arc::new(LoadedEntry {
            entry_id: entry_id.to_string(),
            config,
            coordinator: Arc::clone(&coordinator),
            players,
        });

        // Another setup for the same host may have finished while we were connecting
        let registered = {
            let mut entries = self.entries.write();
            check_unique_in(&entries, entry_id, &entry.config.host)
                .map(|()| entries.insert(entry_id.to_string(), Arc::clone(&entry)))
        };
        if let Err(err) = registered {
            coordinator.shutdown().await?;
            return Err(err);
        }

        coordinator.start();

        info!(
            entry_id,
            host = %entry.config.host,
            players = entry.players.len(),
            "Entry set up"
        );
        Ok(entry)
    }

    /// Stop polling and close the connection; `false` if the entry is unknown
    pub async fn unload_entry(&self, entry_id: &str) -> Result<bool> {
        let entry = self.entries.write().remove(entry_id);
        match entry {
            Some(entry) => {
                entry.coordinator.shutdown().await?;
                info!(entry_id, "Entry unloaded");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn check_unique_in(entries: &HashMap<String, Arc<LoadedEntry>>, entry_id: &str, host: &str) -> Result<()> {
    if entries.contains_key(entry_id) {
        return Err(SdkError::AlreadyConfigured(entry_id.to_string()));
    }
    if entries.values().any(|entry| entry.config.host.eq_ignore_ascii_case(host)) {
        return Err(SdkError::AlreadyConfigured(host.to_string()));
    }
    Ok(())
}

fn build_players(entry_id: &str, config: &EntryConfig, coordinator: &Arc<Coordinator>) -> Vec<Arc<MediaPlayer>> {
    let name = format!("{} Player", config.host);
    let unique_id = format!("{}_player", entry_id);
    let snapshot = coordinator.current();
    let shared_device = DeviceInfo::new(&unique_id, config.display_name(), snapshot.server_info());

    if config.zones.is_empty() {
        let player = MediaPlayer::new(
            Arc::clone(coordinator),
            name,
            unique_id,
            config.browse_paths.clone(),
            None,
        );
        return vec![Arc::new(player)];
    }

    config
        .zones
        .iter()
        .map(|zone| {
            let player = MediaPlayer::new(
                Arc::clone(coordinator),
                format!("{} - {}", name, zone),
                format!("{}-{}", unique_id, zone),
                config.browse_paths.clone(),
                Some(zone.clone()),
            );
            let player = if config.device_per_zone {
                player
            } else {
                player.with_device_info(shared_device.clone())
            };
            Arc::new(player)
        })
        .collect()
}
