//! Logging initialization.
//!
//! Logs go to stderr so that `--format json` output on stdout stays
//! parseable. Verbosity flags raise the level for `breedline` itself first;
//! dependencies only get louder at `-vv` and above. `BREEDLINE_LOG_LEVEL`
//! replaces the computed filter entirely.

use std::io::IsTerminal;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable that overrides the verbosity flags.
pub const LOG_LEVEL_ENV: &str = "BREEDLINE_LOG_LEVEL";

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines with optional ANSI colors.
    #[default]
    Human,
    /// One flattened JSON object per line, for log shippers.
    Json,
}

/// Filter directive for a `-v` count.
///
/// - 0 → warnings from everything
/// - 1 → `breedline` at info
/// - 2 → `breedline` at debug, dependencies at info
/// - 3+ → trace everywhere
#[must_use]
pub const fn filter_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,breedline=info",
        2 => "info,breedline=debug",
        _ => "trace",
    }
}

/// Whether human-format logs should carry ANSI colors.
#[must_use]
pub fn use_ansi(color: ColorChoice) -> bool {
    match color {
        ColorChoice::Auto => {
            std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    }
}

fn build_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)))
}

/// Installs the global subscriber.
///
/// Only the first call in a process takes effect.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let filter = build_filter(verbosity);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Human => builder.with_ansi(use_ansi(color)).try_init(),
        LogFormat::Json => builder
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .try_init(),
    };
}
