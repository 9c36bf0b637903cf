// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that can occur while constructing a replay window.
///
/// Decisions themselves never fail: once a window exists, every sequence number
/// maps to either an accept or a drop.
#[derive(Debug, Error)]
pub enum ReplayWindowError {
    #[error("the replay window must track at least one sequence number")]
    ZeroWindow,

    #[error("{what} must be a non-zero power of two, got {value}")]
    NotPowerOfTwo { what: &'static str, value: u64 },

    #[error("blocked layout of {block_count} blocks of {block_bits} bits does not cover the window size of {window_size}")]
    BlockMismatch {
        block_count: u32,
        block_bits: u32,
        window_size: u32,
    },

    #[error("{block_count} blocks of {block_bits} bits exceed the largest supported window size")]
    WindowTooLarge { block_count: u32, block_bits: u32 },

    #[error("failed to load window configuration using path '{}'. detailed message: {source}", path.display())]
    ConfigLoadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("window configuration at '{}' is malformed: {source}", path.display())]
    MalformedConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ReplayWindowError {
    pub(crate) fn ensure_power_of_two(what: &'static str, value: u64) -> Result<(), Self> {
        if value.is_power_of_two() {
            Ok(())
        } else {
            Err(ReplayWindowError::NotPowerOfTwo { what, value })
        }
    }
}
