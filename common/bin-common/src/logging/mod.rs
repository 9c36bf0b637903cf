// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

#[cfg(feature = "basic_tracing")]
pub use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Filter built out of `RUST_LOG` if it's set, otherwise one that lets through
/// everything at `default_level` or above.
#[cfg(feature = "basic_tracing")]
pub fn env_filter_or(default_level: LevelFilter) -> EnvFilter {
    if ::std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .parse_lossy("")
    }
}

#[cfg(feature = "basic_tracing")]
pub fn default_tracing_env_filter() -> EnvFilter {
    // if the env value was not found, default to `INFO` level rather than `ERROR`
    env_filter_or(LevelFilter::INFO)
}

/// Attach per-crate level overrides, such as `("antireplay_window", LevelFilter::DEBUG)`,
/// on top of the provided filter.
#[cfg(feature = "basic_tracing")]
pub fn with_crate_levels(
    mut filter: EnvFilter,
    levels: &[(&str, LevelFilter)],
) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    for (crate_name, level) in levels {
        filter = filter.add_directive(format!("{crate_name}={level}").parse()?);
    }
    Ok(filter)
}

#[cfg(feature = "basic_tracing")]
pub fn default_tracing_fmt_layer<S, W>(
    writer: W,
) -> impl tracing_subscriber::Layer<S> + Sync + Send + 'static
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Sync + Send + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
}

// logs go to stderr so that stdout stays free for command output
#[cfg(feature = "basic_tracing")]
pub fn setup_tracing_logger_with_filter(filter: EnvFilter) {
    use tracing_subscriber::prelude::*;

    tracing_subscriber::registry()
        .with(default_tracing_fmt_layer(std::io::stderr))
        .with(filter)
        .init()
}

#[cfg(feature = "basic_tracing")]
pub fn setup_tracing_logger() {
    setup_tracing_logger_with_filter(default_tracing_env_filter())
}

#[cfg(all(test, feature = "basic_tracing"))]
mod tests {
    use super::*;

    #[test]
    fn crate_levels_are_appended() {
        let filter = with_crate_levels(
            EnvFilter::new("warn"),
            &[("antireplay_window", LevelFilter::TRACE)],
        )
        .unwrap();

        let rendered = filter.to_string().to_lowercase();
        assert!(rendered.contains("antireplay_window=trace"), "{rendered}");
    }
}
