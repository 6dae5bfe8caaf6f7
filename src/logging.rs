// src/logging.rs

//! Diagnostics for the `selfreload` binary.
//!
//! The filter comes from `--log-level` if given, otherwise from
//! `SELFRELOAD_LOG`, which accepts full `EnvFilter` directives such as
//! `selfreload=debug,notify=warn`. Without either, `info` is used.
//!
//! Output goes to stderr; stdout carries the start-up line only.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "SELFRELOAD_LOG";

/// Install the global subscriber.
///
/// A replaced process image starts without one and installs it again.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return Ok(EnvFilter::new(directive(level)));
    }
    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {LOG_ENV}={directives:?}")),
        None => Ok(EnvFilter::new("info")),
    }
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_beats_environment() {
        let filter = build_filter(Some(LogLevel::Debug), Some("error")).unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn environment_directives_are_used() {
        let filter = build_filter(None, Some("selfreload=trace")).unwrap();
        assert_eq!(filter.to_string(), "selfreload=trace");
    }

    #[test]
    fn defaults_to_info() {
        assert_eq!(build_filter(None, None).unwrap().to_string(), "info");
        assert_eq!(build_filter(None, Some("  ")).unwrap().to_string(), "info");
    }

    #[test]
    fn bad_environment_directive_is_an_error() {
        assert!(build_filter(None, Some("selfreload=loud")).is_err());
    }
}
