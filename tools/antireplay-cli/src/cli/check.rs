// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::open_input;
use crate::error::AntireplayCliError;
use crate::vectors::{is_skippable, parse_packet};
use antireplay_bin_common::output_format::OutputFormat;
use antireplay_window::{Decision, ReplayStats, SessionId, SessionTable, WindowConfig};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use std::io::BufRead;
use std::path::PathBuf;
use tracing::info;

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    /// Read sequence numbers (`seq` or `session,seq` per line) from this file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::default())]
    output: OutputFormat,

    /// Print a summary of all decisions once the input is exhausted.
    #[arg(long)]
    summary: bool,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub(crate) struct CheckedPacket {
    pub(crate) session: SessionId,
    pub(crate) seq: u64,
    pub(crate) decision: Decision,
}

impl Display for CheckedPacket {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}: {}", self.session, self.seq, self.decision)
    }
}

/// Decide every packet read from `reader`, handing each result to `on_decision`
/// as soon as it is known.
pub(crate) fn check_stream<R, F>(
    reader: R,
    config: &WindowConfig,
    mut on_decision: F,
) -> Result<ReplayStats, AntireplayCliError>
where
    R: BufRead,
    F: FnMut(CheckedPacket),
{
    let mut table = SessionTable::new(config)?;
    let mut stats = ReplayStats::default();

    for (idx, raw) in reader.lines().enumerate() {
        let raw = raw.map_err(|source| AntireplayCliError::ReadFailure { source })?;
        if is_skippable(&raw) {
            continue;
        }

        let packet = parse_packet(idx + 1, &raw)?;
        let decision = table.check_and_record(packet.session, packet.seq);
        stats.record(decision);
        on_decision(CheckedPacket {
            session: packet.session,
            seq: packet.seq,
            decision,
        });
    }

    Ok(stats)
}

pub(crate) fn execute(args: Args, config: WindowConfig) -> Result<(), AntireplayCliError> {
    let input = open_input(args.input.as_deref())?;
    let stats = check_stream(input, &config, |checked| args.output.to_stdout(&checked))?;

    info!("{stats}");
    if args.summary {
        args.output.to_stdout(&stats);
    }
    Ok(())
}
