//! Command dispatch
//!
//! Every user-triggered action runs through [`CommandDispatcher::dispatch`],
//! which gives all commands the same failure handling:
//!
//! - connectivity and auth failures are logged once and swallowed
//! - a successful command asks the coordinator for a refresh
//! - anything else is returned to the caller
//!
//! ```rust,ignore
//! dispatcher
//!     .dispatch("volume_up", |ctx| Box::pin(async move {
//!         ctx.server.volume_up(ctx.zone).await
//!     }))
//!     .await?;
//! ```

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{error, trace};

use mcws_api::{ApiError, MediaServer};
use mcws_state::Coordinator;

/// What a command gets to work with
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    pub server: &'a dyn MediaServer,
    /// Zone the dispatching entity targets; `None` is the active zone
    pub zone: Option<&'a str>,
}

/// A boxed command, for callers that build commands ahead of dispatch
pub type CommandFn =
    Box<dyn for<'a> FnOnce(CommandContext<'a>) -> BoxFuture<'a, mcws_api::Result<()>> + Send>;

/// Box a command closure as a [`CommandFn`]
pub fn boxed_command<F>(command: F) -> CommandFn
where
    F: for<'a> FnOnce(CommandContext<'a>) -> BoxFuture<'a, mcws_api::Result<()>> + Send + 'static,
{
    Box::new(command)
}

/// How a dispatched command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The server accepted the command and a refresh was requested
    Completed,
    /// The server was unreachable or refused our credentials
    Suppressed,
}

impl DispatchOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, DispatchOutcome::Completed)
    }
}

/// Runs commands for one entity against its target zone
#[derive(Clone)]
pub struct CommandDispatcher {
    client: Arc<dyn MediaServer>,
    coordinator: Arc<Coordinator>,
    entity_id: String,
    zone: Option<String>,
}

impl CommandDispatcher {
    pub fn new(coordinator: Arc<Coordinator>, entity_id: impl Into<String>, zone: Option<String>) -> Self {
        Self {
            client: Arc::clone(coordinator.client()),
            coordinator,
            entity_id: entity_id.into(),
            zone,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    /// Run `command` and apply the shared failure policy
    ///
    /// The refresh request is fire-and-forget; this returns as soon as the
    /// command itself has finished.
    pub async fn dispatch<F>(&self, action: &str, command: F) -> Result<DispatchOutcome, ApiError>
    where
        F: for<'a> FnOnce(CommandContext<'a>) -> BoxFuture<'a, mcws_api::Result<()>> + Send,
    {
        let ctx = CommandContext {
            server: self.client.as_ref(),
            zone: self.zone.as_deref(),
        };

        match command(ctx).await {
            Ok(()) => {
                let queued = self.coordinator.request_refresh();
                trace!(action, entity_id = %self.entity_id, queued, "Command completed");
                Ok(DispatchOutcome::Completed)
            }
            Err(err) if err.is_connection_failure() => {
                error!(
                    action,
                    entity_id = %self.entity_id,
                    error = %err,
                    "Error calling command on entity"
                );
                Ok(DispatchOutcome::Suppressed)
            }
            Err(err) => Err(err),
        }
    }
}
