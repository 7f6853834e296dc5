//! Tracing subscriber setup for the binary.
//!
//! Logs go to stderr so they never mix with command output. The filter is the
//! first that parses of:
//!
//! 1. `PROMPTDECK_LOG` (directives, e.g. `promptdeckapp=debug,warn`)
//! 2. `RUST_LOG`
//! 3. `--verbose` (debug) / `--quiet` (error) flags, `warn` otherwise

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "PROMPTDECK_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    /// `--verbose` wins when both flags are given.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init(verbosity: Verbosity) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity == Verbosity::Verbose)
        .without_time()
        .compact();

    let _ = tracing_subscriber::registry()
        .with(build_filter(verbosity))
        .with(layer)
        .try_init();
}

fn build_filter(verbosity: Verbosity) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(verbosity.level().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Verbose);
    }

    #[test]
    fn level_mapping() {
        assert_eq!(Verbosity::Quiet.level(), Level::ERROR);
        assert_eq!(Verbosity::Normal.level(), Level::WARN);
        assert_eq!(Verbosity::Verbose.level(), Level::DEBUG);
    }

    #[test]
    fn filter_builds_for_every_verbosity() {
        let _ = build_filter(Verbosity::Quiet);
        let _ = build_filter(Verbosity::Normal);
        let _ = build_filter(Verbosity::Verbose);
    }
}
