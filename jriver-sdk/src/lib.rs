//! # JRiver SDK - media-player entities for JRiver Media Center
//!
//! Presents a JRiver Media Center server to a smart-home host as media-player
//! entities, with command dispatch and a browsable media catalog:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use jriver_sdk::{EntityRegistry, EntryConfig};
//!
//! # async fn run(client: Arc<dyn jriver_sdk::MediaServer>) -> Result<(), jriver_sdk::SdkError> {
//! let registry = EntityRegistry::new();
//! let config = EntryConfig::new("media.local").with_zones(["Living Room"]);
//! let entry = registry.setup_entry("entry1", config, client).await?;
//!
//! let player = &entry.players[0];
//! println!("{:?} at {:?}", player.state(), player.volume_level());
//! player.set_volume_level(0.5).await?;
//!
//! let root = player.browse_media(None, None).await?;
//! for child in &root.children {
//!     println!("{} ({})", child.title, child.media_content_id);
//! }
//!
//! registry.unload_entry("entry1").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! jriver-sdk (MediaPlayer, CommandDispatcher, BrowseResolver)
//!     ↓
//! mcws-state (Coordinator, Snapshot)
//!     ↓
//! mcws-api (MediaServer trait)
//! ```
//!
//! Players never cache state of their own. Every property reads the
//! coordinator's current snapshot, and every command asks the coordinator
//! for a refresh once the server accepted it.

pub mod browse;
pub mod config;
pub mod content;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod media_type;
pub mod player;
pub mod registry;
pub mod services;

/// Integration domain, used in device identifiers and config paths
pub const DOMAIN: &str = "jriver";

pub use browse::{BrowseCursor, BrowseNode, BrowsePath, BrowseResolver, MediaSourceBrowser};
pub use config::EntryConfig;
pub use content::{is_media_source_id, ContentRef};
pub use device::DeviceInfo;
pub use dispatch::{CommandContext, CommandDispatcher, CommandFn, DispatchOutcome};
pub use error::{Result, SdkError};
pub use media_type::CatalogMediaType;
pub use player::{MediaPlayer, PlayerFeatures, PlayerState};
pub use registry::{EntityRegistry, LoadedEntry};
pub use services::ServiceCall;

// Re-export the layers below for convenience
pub use mcws_api::{ApiError, MediaServer};
pub use mcws_state::{Coordinator, CoordinatorConfig, Snapshot};
