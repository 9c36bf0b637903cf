// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::bitmap::Bitmap;
use crate::error::ReplayWindowError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_WINDOW_SIZE: u32 = 1024;

/// Parameters of a replay window. They are fixed once the window gets constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WindowConfig {
    /// Number of trailing sequence numbers tracked for duplicates.
    /// default: 1024
    #[serde(default = "default_window_size")]
    pub window_size: u32,

    /// Layout of the bitmap backing the window.
    /// default: flat
    #[serde(default)]
    pub layout: LayoutConfig,

    /// If set, every sequence number greater than or equal to this value is dropped,
    /// as the counter is considered exhausted and the session should have been rekeyed.
    #[serde(default)]
    pub reject_after: Option<u64>,
}

fn default_window_size() -> u32 {
    DEFAULT_WINDOW_SIZE
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            window_size: DEFAULT_WINDOW_SIZE,
            layout: LayoutConfig::Flat,
            reject_after: None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutConfig {
    /// A single array of independently addressable bits.
    #[default]
    Flat,

    /// `block_count` blocks of `block_bits` bits each.
    /// Both values must be powers of two and their product must equal the window size.
    Blocked { block_count: u32, block_bits: u32 },
}

impl WindowConfig {
    pub fn new(window_size: u32) -> Self {
        WindowConfig {
            window_size,
            ..Default::default()
        }
    }

    pub fn blocked(block_count: u32, block_bits: u32) -> Self {
        WindowConfig {
            window_size: block_count.saturating_mul(block_bits),
            layout: LayoutConfig::Blocked {
                block_count,
                block_bits,
            },
            reject_after: None,
        }
    }

    #[must_use]
    pub fn with_reject_after(mut self, reject_after: u64) -> Self {
        self.reject_after = Some(reject_after);
        self
    }

    /// Check whether a window could be built out of this configuration.
    pub fn validate(&self) -> Result<(), ReplayWindowError> {
        Bitmap::from_config(self).map(|_| ())
    }

    pub fn read_from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ReplayWindowError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|source| ReplayWindowError::ConfigLoadFailure {
                path: path.to_path_buf(),
                source,
            })?;

        let config: WindowConfig =
            toml::from_str(&content).map_err(|source| ReplayWindowError::MalformedConfig {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parsing_blocked_layout() {
        let raw = r#"
            window_size = 32
            reject_after = 1000

            [layout]
            kind = "blocked"
            block_count = 4
            block_bits = 8
        "#;

        let config: WindowConfig = toml::from_str(raw).unwrap();
        assert_eq!(config, WindowConfig::blocked(4, 8).with_reject_after(1000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let config: WindowConfig = toml::from_str("").unwrap();
        assert_eq!(config, WindowConfig::default());

        let config: WindowConfig = toml::from_str("window_size = 77").unwrap();
        assert_eq!(config, WindowConfig::new(77));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(toml::from_str::<WindowConfig>("window = 8").is_err());
    }

    #[test]
    fn validation_catches_misconfiguration() {
        assert!(matches!(
            WindowConfig::new(0).validate(),
            Err(ReplayWindowError::ZeroWindow)
        ));

        let mismatched = WindowConfig {
            window_size: 8,
            layout: LayoutConfig::Blocked {
                block_count: 2,
                block_bits: 8,
            },
            reject_after: None,
        };
        assert!(matches!(
            mismatched.validate(),
            Err(ReplayWindowError::BlockMismatch { .. })
        ));

        assert!(matches!(
            WindowConfig::blocked(6, 8).validate(),
            Err(ReplayWindowError::NotPowerOfTwo { .. })
        ));
    }

    #[test]
    fn reading_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "window_size = 128").unwrap();
        let config = WindowConfig::read_from_toml_file(file.path()).unwrap();
        assert_eq!(config.window_size, 128);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "window_size = 0").unwrap();
        assert!(matches!(
            WindowConfig::read_from_toml_file(file.path()),
            Err(ReplayWindowError::ZeroWindow)
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "window_size = \"big\"").unwrap();
        assert!(matches!(
            WindowConfig::read_from_toml_file(file.path()),
            Err(ReplayWindowError::MalformedConfig { .. })
        ));

        assert!(matches!(
            WindowConfig::read_from_toml_file("/this/path/does/not/exist.toml"),
            Err(ReplayWindowError::ConfigLoadFailure { .. })
        ));
    }
}
