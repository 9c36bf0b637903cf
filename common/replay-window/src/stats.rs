// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::decision::{Decision, DropReason};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Running tally of decisions, kept by the caller so that dropping stays free of
/// side effects on the window itself.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReplayStats {
    pub accepted: u64,
    pub dropped_sentinel: u64,
    pub dropped_exhausted: u64,
    pub dropped_too_old: u64,
    pub dropped_duplicate: u64,
}

impl ReplayStats {
    pub fn record(&mut self, decision: Decision) {
        match decision {
            Decision::Accept => self.accepted += 1,
            Decision::Drop(DropReason::Sentinel) => self.dropped_sentinel += 1,
            Decision::Drop(DropReason::Exhausted) => self.dropped_exhausted += 1,
            Decision::Drop(DropReason::TooOld) => self.dropped_too_old += 1,
            Decision::Drop(DropReason::Duplicate) => self.dropped_duplicate += 1,
        }
    }

    pub fn dropped(&self) -> u64 {
        self.dropped_sentinel
            + self.dropped_exhausted
            + self.dropped_too_old
            + self.dropped_duplicate
    }

    pub fn total(&self) -> u64 {
        self.accepted + self.dropped()
    }
}

impl Extend<Decision> for ReplayStats {
    fn extend<T: IntoIterator<Item = Decision>>(&mut self, iter: T) {
        for decision in iter {
            self.record(decision)
        }
    }
}

impl FromIterator<Decision> for ReplayStats {
    fn from_iter<T: IntoIterator<Item = Decision>>(iter: T) -> Self {
        let mut stats = ReplayStats::default();
        stats.extend(iter);
        stats
    }
}

impl Display for ReplayStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} packets: {} accepted, {} dropped (duplicate: {}, too old: {}, zero: {}, exhausted: {})",
            self.total(),
            self.accepted,
            self.dropped(),
            self.dropped_duplicate,
            self.dropped_too_old,
            self.dropped_sentinel,
            self.dropped_exhausted
        )
    }
}
