// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Outcome of presenting a sequence number to a replay window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accept,
    Drop(DropReason),
}

/// Why a sequence number got dropped. Purely informational: callers that only care
/// about accept-vs-drop can ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The reserved zero sequence number.
    Sentinel,

    /// The sequence number reached the configured rejection limit.
    Exhausted,

    /// The sequence number lies below the trailing window.
    TooOld,

    /// The sequence number lies inside the window and has already been seen.
    Duplicate,
}

impl Decision {
    pub const fn is_accept(&self) -> bool {
        matches!(self, Decision::Accept)
    }

    pub const fn is_drop(&self) -> bool {
        !self.is_accept()
    }

    pub const fn drop_reason(&self) -> Option<DropReason> {
        match self {
            Decision::Accept => None,
            Decision::Drop(reason) => Some(*reason),
        }
    }
}

impl Display for DropReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Sentinel => write!(f, "zero sequence number"),
            DropReason::Exhausted => write!(f, "counter exhausted"),
            DropReason::TooOld => write!(f, "too old"),
            DropReason::Duplicate => write!(f, "duplicate"),
        }
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Accept => write!(f, "accept"),
            Decision::Drop(reason) => write!(f, "drop ({reason})"),
        }
    }
}
