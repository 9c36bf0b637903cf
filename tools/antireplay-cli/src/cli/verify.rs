// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::open_input;
use crate::error::AntireplayCliError;
use crate::vectors::{read_vectors, TestVector};
use antireplay_bin_common::output_format::OutputFormat;
use antireplay_window::{Decision, ReplayStats, SessionId, SessionTable, WindowConfig};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    /// Vector file to verify (`seq,drop` or `session,seq,drop` per line).
    #[arg(long)]
    vectors: PathBuf,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::default())]
    output: OutputFormat,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub(crate) struct Mismatch {
    pub(crate) index: usize,
    pub(crate) session: SessionId,
    pub(crate) seq: u64,
    pub(crate) expected_drop: bool,
    pub(crate) decision: Decision,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct VerificationReport {
    pub(crate) total: usize,
    pub(crate) mismatches: Vec<Mismatch>,
    pub(crate) stats: ReplayStats,
}

impl Display for VerificationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for mismatch in &self.mismatches {
            writeln!(
                f,
                "vector #{}: session {} seq {} was expected to {} but got {}",
                mismatch.index,
                mismatch.session,
                mismatch.seq,
                if mismatch.expected_drop {
                    "drop"
                } else {
                    "accept"
                },
                mismatch.decision
            )?;
        }
        write!(
            f,
            "{}/{} vectors matched. {}",
            self.total - self.mismatches.len(),
            self.total,
            self.stats
        )
    }
}

pub(crate) fn verify(
    config: &WindowConfig,
    vectors: &[TestVector],
) -> Result<VerificationReport, AntireplayCliError> {
    let mut table = SessionTable::new(config)?;
    let mut stats = ReplayStats::default();
    let mut mismatches = Vec::new();

    for (index, vector) in vectors.iter().enumerate() {
        let decision = table.check_and_record(vector.packet.session, vector.packet.seq);
        stats.record(decision);

        if decision.is_drop() != vector.dropped {
            warn!(
                index,
                session = vector.packet.session,
                seq = vector.packet.seq,
                "unexpected decision: {decision}"
            );
            mismatches.push(Mismatch {
                index,
                session: vector.packet.session,
                seq: vector.packet.seq,
                expected_drop: vector.dropped,
                decision,
            })
        }
    }

    Ok(VerificationReport {
        total: vectors.len(),
        mismatches,
        stats,
    })
}

pub(crate) fn execute(args: Args, config: WindowConfig) -> Result<(), AntireplayCliError> {
    let vectors = read_vectors(open_input(Some(&args.vectors))?)?;
    info!(
        "verifying {} vectors from {}",
        vectors.len(),
        args.vectors.display()
    );

    let report = verify(&config, &vectors)?;
    args.output.to_stdout(&report);

    if report.mismatches.is_empty() {
        Ok(())
    } else {
        Err(AntireplayCliError::VerificationFailure {
            mismatches: report.mismatches.len(),
            total: report.total,
        })
    }
}
