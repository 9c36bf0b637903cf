// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use antireplay_window::ReplayWindowError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AntireplayCliError {
    #[error(transparent)]
    Window(#[from] ReplayWindowError),

    #[error("failed to open '{}': {source}", path.display())]
    FileOpenFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read input: {source}")]
    ReadFailure {
        #[source]
        source: io::Error,
    },

    #[error("failed to write output: {source}")]
    WriteFailure {
        #[source]
        source: io::Error,
    },

    #[error("line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    #[error("the shuffled pattern requires a non-empty range, got {start}..{end}")]
    EmptyRange { start: u64, end: u64 },

    #[error("at least one session is required")]
    NoSessions,

    #[error("{mismatches} out of {total} vectors did not match the expected decision")]
    VerificationFailure { mismatches: usize, total: usize },
}

impl AntireplayCliError {
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        AntireplayCliError::MalformedRecord {
            line,
            message: message.into(),
        }
    }
}
