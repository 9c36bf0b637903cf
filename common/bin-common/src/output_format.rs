// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl OutputFormat {
    /// Render `data` either through its `Display` implementation or as a single line of json.
    pub fn format<T: Serialize + ToString>(&self, data: &T) -> String {
        match self {
            OutputFormat::Text => data.to_string(),
            OutputFormat::Json => serde_json::to_string(data)
                .unwrap_or_else(|err| format!("failed to serialize output: {err}")),
        }
    }

    pub fn to_stdout<T: Serialize + ToString>(&self, data: &T) {
        println!("{}", self.format(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        value: u64,
    }

    impl Display for Sample {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "value is {}", self.value)
        }
    }

    #[test]
    fn formatting() {
        let sample = Sample { value: 5 };
        assert_eq!(OutputFormat::Text.format(&sample), "value is 5");
        assert_eq!(OutputFormat::Json.format(&sample), r#"{"value":5}"#);
    }
}
