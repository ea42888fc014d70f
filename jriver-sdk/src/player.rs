//! The media-player entity
//!
//! A [`MediaPlayer`] presents one zone of a media server to the host. All
//! properties read the coordinator's current snapshot; all commands go
//! through the entity's [`CommandDispatcher`].

use std::ops::BitOr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use mcws_api::{McCommand, PlaybackInfo, PlaybackState};
use mcws_state::{Coordinator, Snapshot};

use crate::browse::{BrowseCursor, BrowseNode, BrowsePath, BrowseResolver, MediaSourceBrowser};
use crate::content::{is_media_source_id, ContentRef};
use crate::device::DeviceInfo;
use crate::dispatch::{CommandContext, CommandDispatcher, DispatchOutcome};
use crate::error::{Result, SdkError};
use crate::media_type::CatalogMediaType;
use crate::services::ServiceCall;

/// Player state as the host sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// No playback information for the zone
    Off,
    Idle,
    Paused,
    Playing,
}

impl From<PlaybackState> for PlayerState {
    fn from(state: PlaybackState) -> Self {
        match state {
            PlaybackState::Stopped | PlaybackState::Waiting => PlayerState::Idle,
            PlaybackState::Paused => PlayerState::Paused,
            PlaybackState::Playing => PlayerState::Playing,
        }
    }
}

/// Bit set of the commands a player accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PlayerFeatures(u32);

impl PlayerFeatures {
    pub const PAUSE: Self = Self(1);
    pub const SEEK: Self = Self(2);
    pub const VOLUME_SET: Self = Self(4);
    pub const VOLUME_MUTE: Self = Self(8);
    pub const PREVIOUS_TRACK: Self = Self(16);
    pub const NEXT_TRACK: Self = Self(32);
    pub const PLAY_MEDIA: Self = Self(512);
    pub const VOLUME_STEP: Self = Self(1024);
    pub const STOP: Self = Self(4096);
    pub const CLEAR_PLAYLIST: Self = Self(8192);
    pub const PLAY: Self = Self(16384);
    pub const SHUFFLE_SET: Self = Self(32768);
    pub const BROWSE_MEDIA: Self = Self(131072);

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for PlayerFeatures {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

pub const SUPPORTED_FEATURES: PlayerFeatures = PlayerFeatures(
    PlayerFeatures::PAUSE.0
        | PlayerFeatures::SEEK.0
        | PlayerFeatures::VOLUME_SET.0
        | PlayerFeatures::VOLUME_MUTE.0
        | PlayerFeatures::PREVIOUS_TRACK.0
        | PlayerFeatures::NEXT_TRACK.0
        | PlayerFeatures::PLAY_MEDIA.0
        | PlayerFeatures::VOLUME_STEP.0
        | PlayerFeatures::STOP.0
        | PlayerFeatures::CLEAR_PLAYLIST.0
        | PlayerFeatures::PLAY.0
        | PlayerFeatures::SHUFFLE_SET.0
        | PlayerFeatures::BROWSE_MEDIA.0,
);

/// Convert a server time in milliseconds to the host's unit
///
/// Unknown (absent, zero, negative or out of range) values and live inputs
/// report `None`.
fn host_time(info: &PlaybackInfo, millis: Option<i64>) -> Option<i64> {
    if info.live_input {
        return None;
    }
    millis.filter(|ms| *ms > 0).and_then(|ms| ms.checked_mul(1000))
}

pub struct MediaPlayer {
    unique_id: String,
    name: String,
    coordinator: Arc<Coordinator>,
    dispatcher: CommandDispatcher,
    resolver: BrowseResolver,
    device_info: DeviceInfo,
}

impl MediaPlayer {
    /// Create a player for `zone`, or for the active zone when `None`
    pub fn new(
        coordinator: Arc<Coordinator>,
        name: impl Into<String>,
        unique_id: impl Into<String>,
        browse_paths: Vec<BrowsePath>,
        zone: Option<String>,
    ) -> Self {
        let name = name.into();
        let unique_id = unique_id.into();
        let snapshot = coordinator.current();
        let server_info = snapshot.server_info();

        let resolver = BrowseResolver::new(
            Arc::clone(coordinator.client()),
            server_info.name.clone(),
            browse_paths,
        );

        Self {
            device_info: DeviceInfo::new(&unique_id, name.clone(), server_info),
            dispatcher: CommandDispatcher::new(Arc::clone(&coordinator), unique_id.clone(), zone),
            resolver,
            coordinator,
            unique_id,
            name,
        }
    }

    pub fn with_media_source(mut self, media_source: Arc<dyn MediaSourceBrowser>) -> Self {
        self.resolver = self.resolver.with_media_source(media_source);
        self
    }

    /// Replace the device this player is grouped under
    pub fn with_device_info(mut self, device_info: DeviceInfo) -> Self {
        self.device_info = device_info;
        self
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zone(&self) -> Option<&str> {
        self.dispatcher.zone()
    }

    pub fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    pub fn supported_features(&self) -> PlayerFeatures {
        SUPPORTED_FEATURES
    }

    // ========================================================================
    // Properties
    // ========================================================================

    fn with_playback<R>(&self, read: impl FnOnce(&PlaybackInfo) -> Option<R>) -> Option<R> {
        let snapshot: Arc<Snapshot> = self.coordinator.current();
        snapshot.playback_info(self.zone()).and_then(read)
    }

    pub fn playback_info(&self) -> Option<PlaybackInfo> {
        self.with_playback(|info| Some(info.clone()))
    }

    pub fn state(&self) -> PlayerState {
        self.with_playback(|info| Some(PlayerState::from(info.state)))
            .unwrap_or(PlayerState::Off)
    }

    pub fn volume_level(&self) -> Option<f32> {
        self.with_playback(|info| info.volume)
    }

    pub fn is_volume_muted(&self) -> Option<bool> {
        self.with_playback(|info| info.muted)
    }

    pub fn media_content_id(&self) -> Option<String> {
        self.with_playback(|info| info.file_key.clone())
    }

    pub fn media_content_type(&self) -> Option<CatalogMediaType> {
        self.with_playback(|info| {
            CatalogMediaType::translate(info.media_type.as_ref(), info.media_sub_type.as_ref(), false)
        })
    }

    /// Duration in the host's unit (milliseconds × 1000)
    pub fn media_duration(&self) -> Option<i64> {
        self.with_playback(|info| host_time(info, info.duration_ms))
    }

    /// Position in the host's unit (milliseconds × 1000)
    pub fn media_position(&self) -> Option<i64> {
        self.with_playback(|info| host_time(info, info.position_ms))
    }

    pub fn media_position_updated_at(&self) -> Option<DateTime<Utc>> {
        self.coordinator.current().position_updated_at(self.zone())
    }

    pub fn media_image_url(&self) -> Option<String> {
        self.with_playback(|info| {
            info.image_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .map(|url| self.coordinator.client().make_url(url))
        })
    }

    pub fn media_title(&self) -> Option<String> {
        self.with_playback(|info| info.name.clone())
    }

    pub fn media_artist(&self) -> Option<String> {
        self.with_playback(|info| info.artist.clone())
    }

    pub fn media_album_name(&self) -> Option<String> {
        self.with_playback(|info| info.album.clone())
    }

    pub fn media_album_artist(&self) -> Option<String> {
        self.with_playback(|info| info.album_artist.clone())
    }

    pub fn media_series_title(&self) -> Option<String> {
        self.with_playback(|info| info.series.clone())
    }

    pub fn media_season(&self) -> Option<String> {
        self.with_playback(|info| info.season.clone())
    }

    pub fn media_episode(&self) -> Option<String> {
        self.with_playback(|info| info.episode.clone())
    }

    // ========================================================================
    // Commands
    // ========================================================================

    async fn run<F>(&self, action: &str, command: F) -> Result<DispatchOutcome>
    where
        F: for<'a> FnOnce(CommandContext<'a>) -> BoxFuture<'a, mcws_api::Result<()>> + Send,
    {
        Ok(self.dispatcher.dispatch(action, command).await?)
    }

    pub async fn volume_up(&self) -> Result<DispatchOutcome> {
        self.run("volume_up", |ctx| Box::pin(async move { ctx.server.volume_up(ctx.zone).await }))
            .await
    }

    pub async fn volume_down(&self) -> Result<DispatchOutcome> {
        self.run("volume_down", |ctx| {
            Box::pin(async move { ctx.server.volume_down(ctx.zone).await })
        })
        .await
    }

    /// Set the volume, clamped to `0.0..=1.0`; NaN is refused before dispatch
    pub async fn set_volume_level(&self, volume: f32) -> Result<DispatchOutcome> {
        if volume.is_nan() {
            return Err(SdkError::InvalidServiceCall(format!(
                "volume level must be a number, got {}",
                volume
            )));
        }
        let volume = volume.clamp(0.0, 1.0);
        self.run("set_volume_level", move |ctx| {
            Box::pin(async move { ctx.server.set_volume_level(volume, ctx.zone).await })
        })
        .await
    }

    pub async fn mute_volume(&self, mute: bool) -> Result<DispatchOutcome> {
        self.run("mute_volume", move |ctx| {
            Box::pin(async move { ctx.server.mute(mute, ctx.zone).await })
        })
        .await
    }

    pub async fn media_play_pause(&self) -> Result<DispatchOutcome> {
        self.run("media_play_pause", |ctx| {
            Box::pin(async move { ctx.server.play_pause(ctx.zone).await })
        })
        .await
    }

    pub async fn media_play(&self) -> Result<DispatchOutcome> {
        self.run("media_play", |ctx| Box::pin(async move { ctx.server.play(ctx.zone).await }))
            .await
    }

    pub async fn media_pause(&self) -> Result<DispatchOutcome> {
        self.run("media_pause", |ctx| Box::pin(async move { ctx.server.pause(ctx.zone).await }))
            .await
    }

    pub async fn media_stop(&self) -> Result<DispatchOutcome> {
        self.run("media_stop", |ctx| Box::pin(async move { ctx.server.stop(ctx.zone).await }))
            .await
    }

    pub async fn media_next_track(&self) -> Result<DispatchOutcome> {
        self.run("media_next_track", |ctx| {
            Box::pin(async move { ctx.server.next_track(ctx.zone).await })
        })
        .await
    }

    pub async fn media_previous_track(&self) -> Result<DispatchOutcome> {
        self.run("media_previous_track", |ctx| {
            Box::pin(async move { ctx.server.previous_track(ctx.zone).await })
        })
        .await
    }

    /// Seek to `position` seconds
    pub async fn media_seek(&self, position: f64) -> Result<DispatchOutcome> {
        let position_ms = (position.max(0.0) * 1000.0) as u64;
        self.run("media_seek", move |ctx| {
            Box::pin(async move { ctx.server.media_seek(position_ms, ctx.zone).await })
        })
        .await
    }

    pub async fn set_shuffle(&self, shuffle: bool) -> Result<DispatchOutcome> {
        self.run("set_shuffle", move |ctx| {
            Box::pin(async move { ctx.server.set_shuffle(shuffle, ctx.zone).await })
        })
        .await
    }

    pub async fn clear_playlist(&self) -> Result<DispatchOutcome> {
        self.run("clear_playlist", |ctx| {
            Box::pin(async move { ctx.server.clear_playlist(ctx.zone).await })
        })
        .await
    }

    /// Play `media_id` interpreted according to `media_type`
    ///
    /// Library types (album, artist, track and the video types) expect a
    /// content id and replace Playing Now with it. Malformed content ids
    /// fail before anything is sent to the server.
    pub async fn play_media(&self, media_type: &str, media_id: &str) -> Result<DispatchOutcome> {
        let (media_type, media_id) = if is_media_source_id(media_id) {
            let source = self
                .resolver
                .media_source()
                .ok_or_else(|| SdkError::browse_not_found(media_type, media_id))?;
            let url = source.resolve_media(media_id).await?;
            debug!(media_id, %url, "Resolved media source");
            ("url".to_string(), url)
        } else {
            (media_type.to_string(), media_id.to_string())
        };

        match CatalogMediaType::from_name(&media_type) {
            Some(CatalogMediaType::Playlist) => {
                self.run("play_media", move |ctx| {
                    Box::pin(async move { ctx.server.play_playlist(&media_id, ctx.zone).await })
                })
                .await
            }
            Some(kind) if kind.is_library_content() => {
                let content = ContentRef::parse(&media_id)?;
                self.run("play_media", move |ctx| {
                    Box::pin(async move {
                        ctx.server.clear_playlist(ctx.zone).await?;
                        match content {
                            ContentRef::Folder { node_id, .. } => {
                                ctx.server.play_browse_files(node_id, ctx.zone).await
                            }
                            ContentRef::Item { key } => ctx.server.play_item(&key, ctx.zone).await,
                        }
                    })
                })
                .await
            }
            _ => {
                self.run("play_media", move |ctx| {
                    Box::pin(async move { ctx.server.play_file(&media_id, ctx.zone).await })
                })
                .await
            }
        }
    }

    // ========================================================================
    // Services
    // ========================================================================

    /// Validate and run an entity service
    pub async fn call_service(&self, call: ServiceCall) -> Result<DispatchOutcome> {
        call.validate()?;
        let action = call.name();

        match call {
            ServiceCall::AddToPlaylist {
                play_query,
                playlist_path,
            } => {
                self.run(action, move |ctx| {
                    Box::pin(async move {
                        if let Some(query) = play_query.filter(|q| !q.is_empty()) {
                            return ctx.server.play_search(&query, ctx.zone).await;
                        }
                        if let Some(path) = playlist_path.filter(|p| !p.is_empty()) {
                            return ctx.server.play_playlist(&path, ctx.zone).await;
                        }
                        warn!("Service add_to_playlist requires either play_query or playlist_path");
                        Ok(())
                    })
                })
                .await
            }
            ServiceCall::ActivateZone { zone_name } => {
                self.run(action, move |ctx| {
                    Box::pin(async move { ctx.server.set_active_zone(&zone_name).await })
                })
                .await
            }
            ServiceCall::SendMcc {
                command,
                parameter,
                block,
                zone_name,
            } => {
                let command = McCommand::new(command)
                    .map_err(|err| SdkError::InvalidServiceCall(err.to_string()))?;
                self.run(action, move |ctx| {
                    Box::pin(async move {
                        ctx.server
                            .send_mcc(command, parameter, block, zone_name.as_deref())
                            .await
                    })
                })
                .await
            }
        }
    }

    // ========================================================================
    // Browsing
    // ========================================================================

    /// Browse the media catalog
    ///
    /// Without a content type this is the root. A cursor whose children are
    /// all unsupported is reported as not found.
    pub async fn browse_media(
        &self,
        media_content_type: Option<&str>,
        media_content_id: Option<&str>,
    ) -> Result<BrowseNode> {
        let content_type = match media_content_type.filter(|t| !t.is_empty()) {
            None => {
                let (root, _) = self.resolver.resolve(None).await?;
                return Ok(root);
            }
            Some(content_type) => content_type,
        };

        let content_id = media_content_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SdkError::browse_not_found(content_type, ""))?;

        let cursor = BrowseCursor::new(content_type, content_id);
        match self.resolver.resolve(Some(&cursor)).await? {
            (node, true) => Ok(node),
            (_, false) => Err(SdkError::browse_not_found(content_type, content_id)),
        }
    }
}
