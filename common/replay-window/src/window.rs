// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::bitmap::{Bitmap, BlockedBitmap, FlatBitmap, ReplayBitmap};
use crate::config::WindowConfig;
use crate::decision::{Decision, DropReason};
use crate::error::ReplayWindowError;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// No sequence number has been accepted yet.
    Uninitialized,

    /// At least one sequence number has been accepted.
    Active,
}

// where a sequence number falls relative to the current window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Rejected(DropReason),
    Ahead,
    Inside { slot: usize },
}

/// Sliding-window anti-replay filter in the spirit of RFC 6479.
///
/// The window tracks the trailing range `(highest_seen - W, highest_seen]`. A sequence
/// number is accepted at most once: either because it moves the high-water mark
/// forward, or because it falls inside the window and has not been seen before.
/// Everything else (zero, duplicates and anything below the window) is dropped
/// without touching the state.
///
/// A window is not internally synchronised. At most one `check_and_record` may be in
/// flight for a given window, which `&mut self` already guarantees; see
/// [`SharedSessionTable`](crate::SharedSessionTable) for concurrent access across sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayWindow<B = Bitmap> {
    bitmap: B,
    highest_seen: u64,
    window_size: u64,

    // `Some(W - 1)` if the window size is a power of two
    index_mask: Option<u64>,
    reject_after: Option<u64>,
}

impl ReplayWindow<FlatBitmap> {
    pub fn new_flat(window_size: u32) -> Result<Self, ReplayWindowError> {
        Ok(ReplayWindow::with_bitmap(FlatBitmap::new(window_size)?))
    }
}

impl ReplayWindow<BlockedBitmap> {
    pub fn new_blocked(block_count: u32, block_bits: u32) -> Result<Self, ReplayWindowError> {
        Ok(ReplayWindow::with_bitmap(BlockedBitmap::new(
            block_count,
            block_bits,
        )?))
    }
}

impl ReplayWindow<Bitmap> {
    pub fn from_config(config: &WindowConfig) -> Result<Self, ReplayWindowError> {
        let mut window = ReplayWindow::with_bitmap(Bitmap::from_config(config)?);
        window.reject_after = config.reject_after;
        Ok(window)
    }
}

impl<B: ReplayBitmap> ReplayWindow<B> {
    // the bitmap must be freshly constructed, i.e. all zeroes
    fn with_bitmap(bitmap: B) -> Self {
        let window_size = bitmap.window_size();
        debug_assert!(window_size > 0);

        ReplayWindow {
            bitmap,
            highest_seen: 0,
            window_size,
            index_mask: window_size
                .is_power_of_two()
                .then_some(window_size - 1),
            reject_after: None,
        }
    }

    /// Drop every sequence number greater than or equal to `limit`.
    #[must_use]
    pub fn with_reject_after(mut self, limit: u64) -> Self {
        debug_assert_eq!(self.state(), WindowState::Uninitialized);
        self.reject_after = Some(limit);
        self
    }

    pub fn highest_seen(&self) -> u64 {
        self.highest_seen
    }

    pub fn window_size(&self) -> u64 {
        self.window_size
    }

    pub fn reject_after(&self) -> Option<u64> {
        self.reject_after
    }

    pub fn state(&self) -> WindowState {
        if self.highest_seen == 0 {
            WindowState::Uninitialized
        } else {
            WindowState::Active
        }
    }

    #[inline]
    fn slot(&self, seq: u64) -> usize {
        match self.index_mask {
            Some(mask) => (seq & mask) as usize,
            None => (seq % self.window_size) as usize,
        }
    }

    #[inline]
    fn position(&self, seq: u64) -> Position {
        if seq == 0 {
            return Position::Rejected(DropReason::Sentinel);
        }

        if let Some(limit) = self.reject_after {
            if seq >= limit {
                return Position::Rejected(DropReason::Exhausted);
            }
        }

        if seq > self.highest_seen {
            return Position::Ahead;
        }

        // `seq == highest_seen - W` maps onto the slot of the high-water mark,
        // whose bit is always set, so it is treated as too old straight away
        if self.highest_seen - seq >= self.window_size {
            return Position::Rejected(DropReason::TooOld);
        }

        Position::Inside {
            slot: self.slot(seq),
        }
    }

    /// Return the decision `check_and_record` would make for `seq`, without
    /// recording anything.
    pub fn would_accept(&self, seq: u64) -> Decision {
        match self.position(seq) {
            Position::Rejected(reason) => Decision::Drop(reason),
            Position::Ahead => Decision::Accept,
            Position::Inside { slot } => {
                if self.bitmap.test(slot) {
                    Decision::Drop(DropReason::Duplicate)
                } else {
                    Decision::Accept
                }
            }
        }
    }

    /// Decide whether `seq` should be accepted and, if so, record it.
    ///
    /// The state only changes on accept. Work is bounded by the window size even
    /// for arbitrarily large forward jumps.
    pub fn check_and_record(&mut self, seq: u64) -> Decision {
        match self.position(seq) {
            Position::Rejected(reason) => Decision::Drop(reason),
            Position::Ahead => {
                self.slide_to(seq);
                Decision::Accept
            }
            Position::Inside { slot } => {
                if self.bitmap.test(slot) {
                    Decision::Drop(DropReason::Duplicate)
                } else {
                    self.bitmap.set(slot);
                    Decision::Accept
                }
            }
        }
    }

    /// Check whether `seq` lies inside the current window and has been recorded.
    pub fn is_recorded(&self, seq: u64) -> bool {
        seq != 0
            && seq <= self.highest_seen
            && self.highest_seen - seq < self.window_size
            && self.bitmap.test(self.slot(seq))
    }

    fn slide_to(&mut self, seq: u64) {
        let previous = self.highest_seen;
        let gap = seq - previous;

        if gap >= self.window_size {
            trace!(
                previous,
                seq,
                "window rotated past every tracked slot, clearing the whole bitmap"
            );
            self.bitmap.clear_all();
        } else if gap > 1 {
            // everything strictly between the old and the new high-water mark is stale
            self.clear_slots(previous + 1, gap - 1);
        }

        self.bitmap.set(self.slot(seq));
        self.highest_seen = seq;
    }

    // clear the slots of `count` consecutive sequence numbers starting at `first`,
    // splitting the run where it wraps around the end of the bitmap
    fn clear_slots(&mut self, first: u64, count: u64) {
        debug_assert!(count < self.window_size);

        let start = self.slot(first);
        let count = count as usize;
        let until_end = self.window_size as usize - start;

        if count <= until_end {
            self.bitmap.clear_run(start, count);
        } else {
            self.bitmap.clear_run(start, until_end);
            self.bitmap.clear_run(0, count - until_end);
        }
    }
}
