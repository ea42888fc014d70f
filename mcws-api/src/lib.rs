//! Typed contract for a JRiver Media Center server
//!
//! This crate describes what the rest of the workspace needs from a JRiver
//! Media Center web service (MCWS) connection: an async [`MediaServer`] trait,
//! the values it reports, and the errors it raises. It does not speak the wire
//! protocol itself; hosts plug in their own client.
//!
//! ```rust,ignore
//! use mcws_api::{MediaServer, PlaybackState};
//!
//! async fn now_playing(server: &dyn MediaServer) -> mcws_api::Result<()> {
//!     let info = server.get_playback_info(Some("Living Room")).await?;
//!     if info.state == PlaybackState::Playing {
//!         println!("{:?} by {:?}", info.name, info.artist);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! With the `test-support` feature, [`testing::FakeMediaServer`] provides a
//! scripted in-memory server.

pub mod client;
pub mod error;
pub mod mcc;
pub mod model;

#[cfg(feature = "test-support")]
pub mod testing;

pub use client::MediaServer;
pub use error::{ApiError, Result};
pub use mcc::McCommand;
pub use model::{
    BrowseTarget, MediaSubType, MediaType, NativeBrowseChild, PlaybackInfo, PlaybackState,
    ServerInfo, Zone,
};
