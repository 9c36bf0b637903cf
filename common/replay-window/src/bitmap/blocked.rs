// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use super::ops::{self, WORD_BITS};
use super::ReplayBitmap;
use crate::error::ReplayWindowError;

/// `M` blocks of `N` bits each, `W = M x N`, both powers of two.
///
/// Slot `s` lives in block `s >> log2(N)` at offset `s & (N - 1)`. Blocks are packed
/// into `u64` words: a block narrower than a word occupies an aligned sub-range of
/// one word, a wider block spans whole consecutive words. Either way an entire block
/// can be zeroed with a single masked store or word fill, which is what
/// [`clear_run`](ReplayBitmap::clear_run) does for every block a slide passes over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedBitmap {
    words: Box<[u64]>,
    block_count: usize,
    block_bits: usize,
    block_shift: u32,
}

impl BlockedBitmap {
    pub fn new(block_count: u32, block_bits: u32) -> Result<Self, ReplayWindowError> {
        ReplayWindowError::ensure_power_of_two("block count", block_count as u64)?;
        ReplayWindowError::ensure_power_of_two("block size", block_bits as u64)?;

        let window_size = block_count as u64 * block_bits as u64;
        if window_size > u32::MAX as u64 {
            return Err(ReplayWindowError::WindowTooLarge {
                block_count,
                block_bits,
            });
        }

        let window_size = window_size as usize;
        Ok(BlockedBitmap {
            words: vec![0; ops::words_for(window_size)].into_boxed_slice(),
            block_count: block_count as usize,
            block_bits: block_bits as usize,
            block_shift: block_bits.trailing_zeros(),
        })
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }

    pub fn block_bits(&self) -> usize {
        self.block_bits
    }

    #[inline]
    fn block_of(&self, slot: usize) -> usize {
        slot >> self.block_shift
    }

    #[inline]
    fn clear_block(&mut self, block: usize) {
        let first_bit = block << self.block_shift;
        if self.block_bits >= WORD_BITS {
            ops::clear_words(
                &mut self.words,
                first_bit / WORD_BITS,
                self.block_bits / WORD_BITS,
            );
        } else {
            ops::clear_bits_in_word(&mut self.words, first_bit, self.block_bits);
        }
    }

    // clears part of a single block, one bit at a time
    #[inline]
    fn clear_partial(&mut self, start: usize, end: usize) {
        debug_assert!(end - start < self.block_bits);
        debug_assert_eq!(self.block_of(start), self.block_of(end - 1));

        for slot in start..end {
            ops::clear_bit(&mut self.words, slot);
        }
    }
}

impl ReplayBitmap for BlockedBitmap {
    #[inline]
    fn window_size(&self) -> u64 {
        (self.block_count * self.block_bits) as u64
    }

    #[inline]
    fn test(&self, slot: usize) -> bool {
        ops::check_bit(&self.words, slot)
    }

    #[inline]
    fn set(&mut self, slot: usize) {
        ops::set_bit(&mut self.words, slot);
    }

    fn clear_run(&mut self, start: usize, len: usize) {
        debug_assert!(start + len <= self.block_count * self.block_bits);

        let end = start + len;
        let mut cursor = start;

        // leading partial block
        let offset = cursor & (self.block_bits - 1);
        if offset != 0 {
            let head_end = end.min(cursor - offset + self.block_bits);
            if head_end > cursor {
                self.clear_partial(cursor, head_end);
            }
            cursor = head_end;
        }

        // every block the run fully covers
        while cursor + self.block_bits <= end {
            self.clear_block(self.block_of(cursor));
            cursor += self.block_bits;
        }

        // trailing partial block
        if cursor < end {
            self.clear_partial(cursor, end);
        }
    }

    #[inline]
    fn clear_all(&mut self) {
        let num_words = self.words.len();
        ops::clear_words(&mut self.words, 0, num_words);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::FlatBitmap;

    fn filled(block_count: u32, block_bits: u32) -> BlockedBitmap {
        let mut bitmap = BlockedBitmap::new(block_count, block_bits).unwrap();
        for slot in 0..bitmap.window_size() as usize {
            bitmap.set(slot);
        }
        bitmap
    }

    #[test]
    fn sizes_must_be_powers_of_two() {
        assert!(matches!(
            BlockedBitmap::new(3, 8),
            Err(ReplayWindowError::NotPowerOfTwo {
                what: "block count",
                value: 3
            })
        ));
        assert!(matches!(
            BlockedBitmap::new(4, 0),
            Err(ReplayWindowError::NotPowerOfTwo {
                what: "block size",
                value: 0
            })
        ));
        assert!(BlockedBitmap::new(1, 1).is_ok());
    }

    #[test]
    fn block_decomposition() {
        let bitmap = BlockedBitmap::new(4, 8).unwrap();
        assert_eq!(bitmap.window_size(), 32);
        assert_eq!(bitmap.block_of(0), 0);
        assert_eq!(bitmap.block_of(7), 0);
        assert_eq!(bitmap.block_of(8), 1);
        assert_eq!(bitmap.block_of(31), 3);
    }

    #[test]
    fn clearing_whole_narrow_block() {
        let mut bitmap = filled(4, 8);
        bitmap.clear_run(8, 8);
        for slot in 0..32 {
            assert_eq!(bitmap.test(slot), !(8..16).contains(&slot), "slot {slot}");
        }
    }

    #[test]
    fn clearing_whole_wide_blocks() {
        let mut bitmap = filled(4, 128);
        bitmap.clear_run(128, 256);
        for slot in 0..512 {
            assert_eq!(
                bitmap.test(slot),
                !(128..384).contains(&slot),
                "slot {slot}"
            );
        }
    }

    #[test]
    fn clearing_runs_matches_flat_layout() {
        // every (start, len) pair that fits without wrapping
        for (block_count, block_bits) in [(4, 8), (2, 64), (8, 4), (1, 16), (16, 1)] {
            let size = block_count * block_bits;
            for start in 0..size as usize {
                for len in 0..=(size as usize - start) {
                    let mut blocked = filled(block_count, block_bits);
                    let mut flat = FlatBitmap::new(size).unwrap();
                    for slot in 0..size as usize {
                        flat.set(slot);
                    }

                    blocked.clear_run(start, len);
                    flat.clear_run(start, len);

                    for slot in 0..size as usize {
                        assert_eq!(
                            blocked.test(slot),
                            flat.test(slot),
                            "{block_count}x{block_bits}: start {start}, len {len}, slot {slot}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn clearing_everything() {
        let mut bitmap = filled(8, 16);
        bitmap.clear_all();
        assert!((0..128).all(|slot| !bitmap.test(slot)));
    }
}
