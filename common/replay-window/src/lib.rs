// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Anti-replay protection for per-session packet sequence numbers.
//!
//! A [`ReplayWindow`] remembers which of the most recent `W` sequence numbers have
//! already been seen and decides, for every incoming (already authenticated)
//! sequence number, whether it should be accepted or dropped. Windows are kept per
//! session in a [`SessionTable`] or, when shared between threads, a
//! [`SharedSessionTable`].

#![warn(clippy::expect_used)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::dbg_macro)]

pub mod bitmap;
pub mod config;
pub mod decision;
pub mod error;
pub mod session;
pub mod stats;
pub mod window;

pub use bitmap::{Bitmap, BlockedBitmap, FlatBitmap, ReplayBitmap};
pub use config::{LayoutConfig, WindowConfig, DEFAULT_WINDOW_SIZE};
pub use decision::{Decision, DropReason};
pub use error::ReplayWindowError;
pub use session::{SessionId, SessionTable, SharedSessionTable};
pub use stats::ReplayStats;
pub use window::{ReplayWindow, WindowState};
