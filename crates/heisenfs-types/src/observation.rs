//! Observation states and the operations that move files between them.
//!
//! Every operation applied to a file "observes" it, and every observation
//! leaves the file in the state named after that operation. The transition
//! logic itself lives in the kernel; these are the shared vocabulary types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// The last observation applied to a file.
#[derive(
    Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize, Default, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive, serialize_all = "snake_case")]
pub enum ObservationState {
    /// Freshly allocated, not yet observed.
    #[default]
    New,
    /// Created by the bridge.
    Created,
    /// Attributes were queried.
    StatQueried,
    /// Access and modify times were set.
    TimesSet,
    /// Opened.
    Opened,
    /// Size was changed by truncate.
    Truncated,
    /// Contents were read.
    Read,
    /// Contents were written.
    Written,
    /// A handle was released.
    Released,
    /// Observed by a directory listing.
    Listed,
}

impl ObservationState {
    /// All states, in declaration order.
    pub const ALL: [ObservationState; 10] = [
        ObservationState::New,
        ObservationState::Created,
        ObservationState::StatQueried,
        ObservationState::TimesSet,
        ObservationState::Opened,
        ObservationState::Truncated,
        ObservationState::Read,
        ObservationState::Written,
        ObservationState::Released,
        ObservationState::Listed,
    ];

    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationState::New => "new",
            ObservationState::Created => "created",
            ObservationState::StatQueried => "stat_queried",
            ObservationState::TimesSet => "times_set",
            ObservationState::Opened => "opened",
            ObservationState::Truncated => "truncated",
            ObservationState::Read => "read",
            ObservationState::Written => "written",
            ObservationState::Released => "released",
            ObservationState::Listed => "listed",
        }
    }
}

impl std::fmt::Display for ObservationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// An operation that observes a file.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum Operation {
    #[strum(serialize = "create")]
    Create,
    #[strum(serialize = "stat", serialize = "stat_query", serialize = "getattr")]
    StatQuery,
    #[strum(serialize = "set_times", serialize = "utimens", serialize = "utime")]
    SetTimes,
    #[strum(serialize = "open")]
    Open,
    #[strum(serialize = "truncate")]
    Truncate,
    #[strum(serialize = "read")]
    Read,
    #[strum(serialize = "write")]
    Write,
    #[strum(serialize = "release")]
    Release,
    #[strum(serialize = "list", serialize = "readdir", serialize = "ls")]
    List,
}

impl Operation {
    /// Parse from string (case-insensitive).
    ///
    /// Accepts the FUSE callback names as aliases: "getattr", "utimens", "readdir".
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::StatQuery => "stat",
            Operation::SetTimes => "set_times",
            Operation::Open => "open",
            Operation::Truncate => "truncate",
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::Release => "release",
            Operation::List => "list",
        }
    }

    /// The state a file is left in after this operation observes it.
    pub fn resulting_state(&self) -> ObservationState {
        match self {
            Operation::Create => ObservationState::Created,
            Operation::StatQuery => ObservationState::StatQueried,
            Operation::SetTimes => ObservationState::TimesSet,
            Operation::Open => ObservationState::Opened,
            Operation::Truncate => ObservationState::Truncated,
            Operation::Read => ObservationState::Read,
            Operation::Write => ObservationState::Written,
            Operation::Release => ObservationState::Released,
            Operation::List => ObservationState::Listed,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
