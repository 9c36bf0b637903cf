// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::open_output;
use crate::error::AntireplayCliError;
use crate::generator::{generate, GeneratorParams, Pattern};
use crate::vectors::{write_vectors, Packet, TestVector};
use antireplay_window::{ReplayStats, SessionTable, WindowConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::path::PathBuf;
use tracing::info;

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    /// Shape of the generated sequence numbers.
    #[arg(long, value_enum, default_value_t = Pattern::Bursty)]
    pattern: Pattern,

    /// Number of sequence numbers generated per session (ignored by the shuffled pattern).
    #[arg(long, default_value_t = 1000)]
    count: usize,

    /// Seed of the random number generator.
    #[arg(long, default_value_t = 123)]
    seed: u64,

    /// Number of independent sessions to interleave.
    #[arg(long, default_value_t = 1)]
    sessions: u64,

    /// First value of the shuffled range.
    #[arg(long, default_value_t = 100)]
    range_start: u64,

    /// End (exclusive) of the shuffled range.
    #[arg(long, default_value_t = 150)]
    range_end: u64,

    /// Number of random pairwise swaps applied to the shuffled range.
    #[arg(long, default_value_t = 40)]
    swaps: usize,

    /// Largest gap between consecutive values of the monotonic pattern.
    #[arg(long, default_value_t = 16)]
    max_gap: u64,

    /// Largest value produced by the random pattern.
    #[arg(long, default_value_t = u64::MAX)]
    max_seq: u64,

    /// Write the vectors to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn generator_params(&self, config: &WindowConfig) -> GeneratorParams {
        GeneratorParams {
            pattern: self.pattern,
            count: self.count,
            sessions: self.sessions,
            window_size: config.window_size as u64,
            range: self.range_start..self.range_end,
            swaps: self.swaps,
            max_gap: self.max_gap,
            max_seq: self.max_seq,
        }
    }
}

/// Attach the decision a fresh set of windows makes to every packet.
pub(crate) fn expected_vectors(
    config: &WindowConfig,
    packets: &[Packet],
) -> Result<(Vec<TestVector>, ReplayStats), AntireplayCliError> {
    let mut table = SessionTable::new(config)?;
    let mut stats = ReplayStats::default();

    let vectors = packets
        .iter()
        .map(|&packet| {
            let decision = table.check_and_record(packet.session, packet.seq);
            stats.record(decision);
            TestVector {
                packet,
                dropped: decision.is_drop(),
            }
        })
        .collect();

    Ok((vectors, stats))
}

pub(crate) fn execute(args: Args, config: WindowConfig) -> Result<(), AntireplayCliError> {
    let mut rng = ChaCha20Rng::seed_from_u64(args.seed);
    let packets = generate(&mut rng, &args.generator_params(&config))?;
    let (vectors, stats) = expected_vectors(&config, &packets)?;

    let header = format!(
        "pattern: {:?}, seed: {}, sessions: {}\nwindow: {:?}\n{stats}",
        args.pattern, args.seed, args.sessions, config
    );
    let output = open_output(args.output.as_deref())?;
    write_vectors(output, &header, &vectors, args.sessions > 1)?;

    info!("generated {stats}");
    Ok(())
}
