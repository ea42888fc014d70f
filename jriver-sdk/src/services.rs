//! Entity services
//!
//! Services beyond the standard media-player commands. Calls arrive as JSON
//! tagged by `service` and are validated before they reach the server.
//!
//! ```json
//! { "service": "send_mcc", "command": 10005, "parameter": 1 }
//! ```

use serde::{Deserialize, Serialize};

use mcws_api::McCommand;

use crate::error::{Result, SdkError};

pub const SERVICE_ADD_TO_PLAYLIST: &str = "add_to_playlist";
pub const SERVICE_ACTIVATE_ZONE: &str = "activate_zone";
pub const SERVICE_SEND_MCC: &str = "send_mcc";

fn default_block() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "service", rename_all = "snake_case")]
pub enum ServiceCall {
    /// Queue the results of a library search, or play a playlist
    ///
    /// The query wins when both are given.
    AddToPlaylist {
        #[serde(default)]
        play_query: Option<String>,
        #[serde(default)]
        playlist_path: Option<String>,
    },
    ActivateZone { zone_name: String },
    /// Raw MCC passthrough; `zone_name` defaults to the active zone, not the
    /// entity's zone
    SendMcc {
        command: u32,
        #[serde(default)]
        parameter: Option<i32>,
        #[serde(default = "default_block")]
        block: bool,
        #[serde(default)]
        zone_name: Option<String>,
    },
}

impl ServiceCall {
    pub fn from_json(json: &str) -> Result<Self> {
        let call: ServiceCall = serde_json::from_str(json)?;
        call.validate()?;
        Ok(call)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ServiceCall::AddToPlaylist { .. } => SERVICE_ADD_TO_PLAYLIST,
            ServiceCall::ActivateZone { .. } => SERVICE_ACTIVATE_ZONE,
            ServiceCall::SendMcc { .. } => SERVICE_SEND_MCC,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ServiceCall::AddToPlaylist { .. } => Ok(()),
            ServiceCall::ActivateZone { zone_name } => {
                if zone_name.trim().is_empty() {
                    return Err(SdkError::InvalidServiceCall(
                        "activate_zone requires a zone_name".to_string(),
                    ));
                }
                Ok(())
            }
            ServiceCall::SendMcc { .. } => self.mcc_command().map(|_| ()),
        }
    }

    /// The validated MCC code of a `send_mcc` call
    pub fn mcc_command(&self) -> Result<McCommand> {
        match self {
            ServiceCall::SendMcc { command, .. } => McCommand::new(*command)
                .map_err(|err| SdkError::InvalidServiceCall(err.to_string())),
            other => Err(SdkError::InvalidServiceCall(format!(
                "{} is not an MCC call",
                other.name()
            ))),
        }
    }
}
