// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

#![warn(clippy::expect_used)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::dbg_macro)]

use antireplay_bin_common::logging::setup_tracing_logger;
use clap::Parser;

pub(crate) mod cli;
pub(crate) mod error;
pub(crate) mod generator;
pub(crate) mod vectors;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    setup_tracing_logger();

    Ok(args.execute()?)
}
