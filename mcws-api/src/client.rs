//! The Remote Media Client contract
//!
//! `MediaServer` is the seam between this workspace and whatever speaks the
//! MCWS wire protocol. Every call may fail with [`ApiError::Connectivity`] or
//! [`ApiError::Auth`]; callers decide whether to absorb those.
//!
//! Zone arguments are zone names. `None` targets the server's active zone.
//!
//! [`ApiError::Connectivity`]: crate::ApiError::Connectivity
//! [`ApiError::Auth`]: crate::ApiError::Auth

use async_trait::async_trait;

use crate::error::Result;
use crate::mcc::McCommand;
use crate::model::{NativeBrowseChild, PlaybackInfo, ServerInfo, Zone};

#[async_trait]
pub trait MediaServer: Send + Sync {
    // ========================================================================
    // Connection
    // ========================================================================

    /// Open the connection and authenticate
    async fn connect(&self) -> Result<()>;

    /// Release the connection; further calls fail with `Connectivity`
    async fn close(&self) -> Result<()>;

    // ========================================================================
    // State queries
    // ========================================================================

    async fn get_server_info(&self) -> Result<ServerInfo>;

    /// Zones in the order the server lists them
    async fn get_zones(&self) -> Result<Vec<Zone>>;

    async fn get_playback_info(&self, zone: Option<&str>) -> Result<PlaybackInfo>;

    async fn get_active_zone(&self) -> Result<Zone>;

    async fn set_active_zone(&self, name: &str) -> Result<()>;

    // ========================================================================
    // Transport controls
    // ========================================================================

    async fn play_pause(&self, zone: Option<&str>) -> Result<()>;

    async fn play(&self, zone: Option<&str>) -> Result<()>;

    async fn pause(&self, zone: Option<&str>) -> Result<()>;

    async fn stop(&self, zone: Option<&str>) -> Result<()>;

    async fn next_track(&self, zone: Option<&str>) -> Result<()>;

    async fn previous_track(&self, zone: Option<&str>) -> Result<()>;

    /// Seek to an absolute position in milliseconds
    async fn media_seek(&self, position_ms: u64, zone: Option<&str>) -> Result<()>;

    async fn volume_up(&self, zone: Option<&str>) -> Result<()>;

    async fn volume_down(&self, zone: Option<&str>) -> Result<()>;

    /// Set the volume, range 0.0-1.0
    async fn set_volume_level(&self, volume: f32, zone: Option<&str>) -> Result<()>;

    async fn mute(&self, mute: bool, zone: Option<&str>) -> Result<()>;

    async fn set_shuffle(&self, shuffle: bool, zone: Option<&str>) -> Result<()>;

    async fn clear_playlist(&self, zone: Option<&str>) -> Result<()>;

    // ========================================================================
    // Content controls
    // ========================================================================

    async fn play_file(&self, path: &str, zone: Option<&str>) -> Result<()>;

    async fn play_playlist(&self, path: &str, zone: Option<&str>) -> Result<()>;

    /// Replace Playing Now with the results of a library search
    async fn play_search(&self, query: &str, zone: Option<&str>) -> Result<()>;

    async fn play_item(&self, key: &str, zone: Option<&str>) -> Result<()>;

    /// Play every file below a browse node
    async fn play_browse_files(&self, node_id: i64, zone: Option<&str>) -> Result<()>;

    // ========================================================================
    // Browse
    // ========================================================================

    /// Children of a browse node in server order; `None` lists the top level
    async fn get_browse_children(&self, node_id: Option<i64>) -> Result<Vec<NativeBrowseChild>>;

    // ========================================================================
    // Raw passthrough
    // ========================================================================

    async fn send_mcc(
        &self,
        command: McCommand,
        param: Option<i32>,
        block: bool,
        zone: Option<&str>,
    ) -> Result<()>;

    /// Turn a server-relative path (such as an image URL) into an absolute URL
    fn make_url(&self, path: &str) -> String;
}
