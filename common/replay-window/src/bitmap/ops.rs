// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Scalar word-level operations on a `u64`-backed bitmap.

pub(crate) const WORD_BITS: usize = u64::BITS as usize;

/// Number of `u64` words needed to hold `bits` bits.
#[inline(always)]
pub(crate) fn words_for(bits: usize) -> usize {
    bits.div_ceil(WORD_BITS)
}

#[inline(always)]
pub(crate) fn set_bit(bitmap: &mut [u64], bit_idx: usize) {
    let word_idx = bit_idx / WORD_BITS;
    let bit_pos = bit_idx % WORD_BITS;
    bitmap[word_idx] |= 1u64 << bit_pos;
}

#[inline(always)]
pub(crate) fn clear_bit(bitmap: &mut [u64], bit_idx: usize) {
    let word_idx = bit_idx / WORD_BITS;
    let bit_pos = bit_idx % WORD_BITS;
    bitmap[word_idx] &= !(1u64 << bit_pos);
}

#[inline(always)]
pub(crate) fn check_bit(bitmap: &[u64], bit_idx: usize) -> bool {
    let word_idx = bit_idx / WORD_BITS;
    let bit_pos = bit_idx % WORD_BITS;
    (bitmap[word_idx] & (1u64 << bit_pos)) != 0
}

/// Zero `num_words` whole words starting at `start_idx`.
#[inline(always)]
pub(crate) fn clear_words(bitmap: &mut [u64], start_idx: usize, num_words: usize) {
    debug_assert!(start_idx + num_words <= bitmap.len());
    bitmap[start_idx..start_idx + num_words].fill(0);
}

/// Zero `len` bits starting at `bit_idx`. The range must not cross a word boundary.
#[inline(always)]
pub(crate) fn clear_bits_in_word(bitmap: &mut [u64], bit_idx: usize, len: usize) {
    let bit_pos = bit_idx % WORD_BITS;
    debug_assert!(len > 0 && bit_pos + len <= WORD_BITS);

    let mask = if len == WORD_BITS {
        u64::MAX
    } else {
        ((1u64 << len) - 1) << bit_pos
    };
    bitmap[bit_idx / WORD_BITS] &= !mask;
}
