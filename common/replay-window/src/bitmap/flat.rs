// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use super::ReplayBitmap;
use crate::error::ReplayWindowError;
use bitvec::prelude::*;

/// A single array of `W` independently addressable bits.
///
/// This is the reference layout. Unlike [`BlockedBitmap`](super::BlockedBitmap) it
/// accepts any non-zero window size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatBitmap {
    bits: BitVec<u64, Lsb0>,
}

impl FlatBitmap {
    pub fn new(window_size: u32) -> Result<Self, ReplayWindowError> {
        if window_size == 0 {
            return Err(ReplayWindowError::ZeroWindow);
        }

        Ok(FlatBitmap {
            bits: bitvec![u64, Lsb0; 0; window_size as usize],
        })
    }
}

impl ReplayBitmap for FlatBitmap {
    #[inline]
    fn window_size(&self) -> u64 {
        self.bits.len() as u64
    }

    #[inline]
    fn test(&self, slot: usize) -> bool {
        self.bits[slot]
    }

    #[inline]
    fn set(&mut self, slot: usize) {
        self.bits.set(slot, true);
    }

    #[inline]
    fn clear_run(&mut self, start: usize, len: usize) {
        self.bits[start..start + len].fill(false);
    }

    #[inline]
    fn clear_all(&mut self) {
        self.bits.fill(false);
    }
}
