// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Storage layouts for the "seen" bits of a replay window.
//!
//! Both layouts hold exactly `W` bits, one per slot, and must yield identical
//! accept/drop decisions when driven by the same window logic. They only differ in
//! how a run of stale slots gets cleared when the window slides forward.

use crate::config::{LayoutConfig, WindowConfig};
use crate::error::ReplayWindowError;

pub use self::blocked::BlockedBitmap;
pub use self::flat::FlatBitmap;

mod blocked;
mod flat;
pub(crate) mod ops;

/// Operations the replay window needs from its backing bitmap.
///
/// Slots are always in `0..window_size()`. Mapping a sequence number onto a slot is
/// the job of the window, not of the bitmap.
pub trait ReplayBitmap {
    /// Number of slots tracked by this bitmap.
    fn window_size(&self) -> u64;

    /// Check whether the given slot is marked as seen.
    fn test(&self, slot: usize) -> bool;

    /// Mark the given slot as seen.
    fn set(&mut self, slot: usize);

    /// Clear `len` consecutive slots starting at `start`.
    /// The run never wraps around, i.e. `start + len <= window_size()`.
    fn clear_run(&mut self, start: usize, len: usize);

    /// Clear every slot.
    fn clear_all(&mut self);
}

/// A bitmap whose layout got picked at runtime, e.g. from a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bitmap {
    Flat(FlatBitmap),
    Blocked(BlockedBitmap),
}

impl Bitmap {
    pub fn from_config(config: &WindowConfig) -> Result<Self, ReplayWindowError> {
        match config.layout {
            LayoutConfig::Flat => FlatBitmap::new(config.window_size).map(Bitmap::Flat),
            LayoutConfig::Blocked {
                block_count,
                block_bits,
            } => {
                let bitmap = BlockedBitmap::new(block_count, block_bits)?;
                if bitmap.window_size() != config.window_size as u64 {
                    return Err(ReplayWindowError::BlockMismatch {
                        block_count,
                        block_bits,
                        window_size: config.window_size,
                    });
                }
                Ok(Bitmap::Blocked(bitmap))
            }
        }
    }
}

impl ReplayBitmap for Bitmap {
    #[inline]
    fn window_size(&self) -> u64 {
        match self {
            Bitmap::Flat(inner) => inner.window_size(),
            Bitmap::Blocked(inner) => inner.window_size(),
        }
    }

    #[inline]
    fn test(&self, slot: usize) -> bool {
        match self {
            Bitmap::Flat(inner) => inner.test(slot),
            Bitmap::Blocked(inner) => inner.test(slot),
        }
    }

    #[inline]
    fn set(&mut self, slot: usize) {
        match self {
            Bitmap::Flat(inner) => inner.set(slot),
            Bitmap::Blocked(inner) => inner.set(slot),
        }
    }

    #[inline]
    fn clear_run(&mut self, start: usize, len: usize) {
        match self {
            Bitmap::Flat(inner) => inner.clear_run(start, len),
            Bitmap::Blocked(inner) => inner.clear_run(start, len),
        }
    }

    #[inline]
    fn clear_all(&mut self) {
        match self {
            Bitmap::Flat(inner) => inner.clear_all(),
            Bitmap::Blocked(inner) => inner.clear_all(),
        }
    }
}
