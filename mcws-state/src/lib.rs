//! JRiver Media Center state synchronization
//!
//! Keeps an immutable [`Snapshot`] of a media server's zones and playback in
//! step with the server.
//!
//! # Architecture
//!
//! ```text
//! MediaServer ──poll──> Coordinator ──Arc<Snapshot>──> watchers / listeners
//!      ^                     ^
//!      └──── commands ───────┴── request_refresh()
//! ```
//!
//! - [`Coordinator`] refreshes on a timer and on demand, one cycle at a time.
//! - A failed cycle keeps the previous snapshot; subscribers see no change.
//! - Snapshots are replaced wholesale, never edited in place.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod snapshot;

pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, Listener, ListenerId, SnapshotWatcher};
pub use error::{Result, StateError};
pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};
pub use snapshot::{Snapshot, SnapshotBuilder, ZoneKey};
