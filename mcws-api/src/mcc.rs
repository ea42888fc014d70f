//! Media Core Commands (MCC)
//!
//! MCWS exposes `Control/MCC`, a raw passthrough for the numeric command set
//! used by the JRiver UI. Valid codes live in `[10000, 40000]`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::error::ApiError;

/// Range of command codes accepted by `Control/MCC`
pub const MCC_RANGE: RangeInclusive<u32> = 10_000..=40_000;

/// A validated MCC command code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct McCommand(u32);

impl McCommand {
    pub const PLAY_PAUSE: McCommand = McCommand(10_000);
    pub const PLAY: McCommand = McCommand(10_001);
    pub const STOP: McCommand = McCommand(10_002);
    pub const NEXT: McCommand = McCommand(10_003);
    pub const PREVIOUS: McCommand = McCommand(10_004);

    /// Validate a raw code against [`MCC_RANGE`]
    pub fn new(code: u32) -> Result<Self, ApiError> {
        if MCC_RANGE.contains(&code) {
            Ok(Self(code))
        } else {
            Err(ApiError::InvalidParameter(format!(
                "MCC command {} is out of range [{}, {}]",
                code,
                MCC_RANGE.start(),
                MCC_RANGE.end()
            )))
        }
    }

    pub fn code(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for McCommand {
    type Error = ApiError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        McCommand::new(code)
    }
}

impl From<McCommand> for u32 {
    fn from(command: McCommand) -> Self {
        command.0
    }
}

impl fmt::Display for McCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MCC {}", self.0)
    }
}
