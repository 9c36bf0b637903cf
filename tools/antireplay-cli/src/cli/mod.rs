// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::AntireplayCliError;
use antireplay_window::{LayoutConfig, WindowConfig};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

mod check;
mod generate;
mod verify;

/// Parameters of the replay windows used by every command.
/// Explicit flags take precedence over values loaded from `--config`.
#[derive(clap::Args, Debug, Clone, Default)]
pub(crate) struct WindowArgs {
    /// Path to a TOML file with the window configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of trailing sequence numbers tracked per session.
    #[arg(long, global = true)]
    window_size: Option<u32>,

    /// Use the blocked layout with this many blocks (requires --block-bits).
    #[arg(long, global = true, requires = "block_bits")]
    block_count: Option<u32>,

    /// Use the blocked layout with blocks of this many bits (requires --block-count).
    #[arg(long, global = true, requires = "block_count")]
    block_bits: Option<u32>,

    /// Drop every sequence number greater than or equal to this value.
    #[arg(long, global = true)]
    reject_after: Option<u64>,
}

impl WindowArgs {
    pub(crate) fn resolve(&self) -> Result<WindowConfig, AntireplayCliError> {
        let mut config = match &self.config {
            Some(path) => {
                debug!("loading window configuration from {}", path.display());
                WindowConfig::read_from_toml_file(path)?
            }
            None => WindowConfig::default(),
        };

        if let (Some(block_count), Some(block_bits)) = (self.block_count, self.block_bits) {
            config.layout = LayoutConfig::Blocked {
                block_count,
                block_bits,
            };
            config.window_size = block_count.saturating_mul(block_bits);
        }
        if let Some(window_size) = self.window_size {
            config.window_size = window_size;
        }
        if let Some(reject_after) = self.reject_after {
            config.reject_after = Some(reject_after);
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Parser, Debug)]
#[command(name = "antireplay", author = "Nymtech", version, about)]
pub(crate) struct Cli {
    #[command(flatten)]
    window: WindowArgs,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub(crate) fn execute(self) -> Result<(), AntireplayCliError> {
        let config = self.window.resolve()?;
        debug!("using window configuration: {config:?}");

        match self.command {
            Commands::Generate(args) => generate::execute(args, config),
            Commands::Verify(args) => verify::execute(args, config),
            Commands::Check(args) => check::execute(args, config),
        }
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Generate a file of sequence numbers together with their expected decisions
    Generate(generate::Args),

    /// Replay a vector file through fresh windows and report every mismatch
    Verify(verify::Args),

    /// Stream sequence numbers and print the decision for each of them
    Check(check::Args),
}

pub(crate) fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>, AntireplayCliError> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|source| AntireplayCliError::FileOpenFailure {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

pub(crate) fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, AntireplayCliError> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|source| AntireplayCliError::FileOpenFailure {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}
