// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::AntireplayCliError;
use crate::vectors::Packet;
use antireplay_window::SessionId;
use rand::Rng;
use std::ops::Range;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Pattern {
    /// Uniformly random values up to `max_seq`
    Random,

    /// A contiguous range with a number of random pairwise swaps
    Shuffled,

    /// Strictly increasing values separated by random gaps
    Monotonic,

    /// Values hovering around the current high-water mark, including duplicates,
    /// reordering, zeroes and the occasional large forward jump
    Bursty,
}

#[derive(Debug, Clone)]
pub(crate) struct GeneratorParams {
    pub(crate) pattern: Pattern,
    pub(crate) count: usize,
    pub(crate) sessions: u64,
    pub(crate) window_size: u64,
    pub(crate) range: Range<u64>,
    pub(crate) swaps: usize,
    pub(crate) max_gap: u64,
    pub(crate) max_seq: u64,
}

impl GeneratorParams {
    fn validate(&self) -> Result<(), AntireplayCliError> {
        if self.sessions == 0 {
            return Err(AntireplayCliError::NoSessions);
        }
        if self.pattern == Pattern::Shuffled && self.range.is_empty() {
            return Err(AntireplayCliError::EmptyRange {
                start: self.range.start,
                end: self.range.end,
            });
        }
        Ok(())
    }
}

fn random_stream<R: Rng>(rng: &mut R, params: &GeneratorParams) -> Vec<u64> {
    (0..params.count)
        .map(|_| rng.gen_range(0..=params.max_seq))
        .collect()
}

fn shuffled_stream<R: Rng>(rng: &mut R, params: &GeneratorParams) -> Vec<u64> {
    let mut seqs: Vec<u64> = params.range.clone().collect();
    for _ in 0..params.swaps {
        let a = rng.gen_range(0..seqs.len());
        let b = rng.gen_range(0..seqs.len());
        seqs.swap(a, b);
    }
    seqs
}

fn monotonic_stream<R: Rng>(rng: &mut R, params: &GeneratorParams) -> Vec<u64> {
    let mut seq = 0u64;
    let mut seqs = Vec::with_capacity(params.count);
    for _ in 0..params.count {
        seq = seq.saturating_add(rng.gen_range(1..=params.max_gap.max(1)));
        seqs.push(seq);
    }
    seqs
}

fn bursty_stream<R: Rng>(rng: &mut R, params: &GeneratorParams) -> Vec<u64> {
    let window = params.window_size.max(1);
    let mut seqs: Vec<u64> = Vec::with_capacity(params.count);
    let mut top = 1u64;

    for _ in 0..params.count {
        let roll = rng.gen_range(0..100);
        let seq = if roll < 2 {
            0
        } else if roll < 10 && !seqs.is_empty() {
            seqs[rng.gen_range(0..seqs.len())]
        } else if roll < 12 {
            top.saturating_add(rng.gen_range(window..=window.saturating_mul(100)))
        } else {
            let offset = rng.gen_range(0..=window.saturating_mul(2));
            top.saturating_add(offset).saturating_sub(window + 1)
        };
        top = top.max(seq);
        seqs.push(seq);
    }
    seqs
}

/// Produce a stream of packets following the given pattern independently for every
/// session, interleaved randomly while preserving the per-session order.
pub(crate) fn generate<R: Rng>(
    rng: &mut R,
    params: &GeneratorParams,
) -> Result<Vec<Packet>, AntireplayCliError> {
    params.validate()?;

    let mut streams: Vec<(SessionId, std::vec::IntoIter<u64>)> = (0..params.sessions)
        .map(|session| {
            let seqs = match params.pattern {
                Pattern::Random => random_stream(rng, params),
                Pattern::Shuffled => shuffled_stream(rng, params),
                Pattern::Monotonic => monotonic_stream(rng, params),
                Pattern::Bursty => bursty_stream(rng, params),
            };
            (session, seqs.into_iter())
        })
        .collect();

    let total = streams.iter().map(|(_, seqs)| seqs.len()).sum();
    let mut packets = Vec::with_capacity(total);

    while !streams.is_empty() {
        let pick = rng.gen_range(0..streams.len());
        let (session, seqs) = &mut streams[pick];
        match seqs.next() {
            Some(seq) => packets.push(Packet {
                session: *session,
                seq,
            }),
            None => {
                streams.swap_remove(pick);
            }
        }
    }

    Ok(packets)
}
