//! Tracing setup for binaries built on the framework.
//!
//! Logs go to stderr so stdout stays reserved for command output. The filter
//! comes from `CLIFW_LOG` when set, otherwise from the configured level
//! (`debug` when the `--debug` global flag is present).

use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "CLIFW_LOG";

fn build_filter(level: &str, debug: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        let fallback = if debug { "debug" } else { level };
        EnvFilter::try_new(fallback).unwrap_or_else(|_| EnvFilter::new("warn"))
    })
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init_logging(config: &CliConfig, debug: bool) -> bool {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(build_filter(&config.log_level, debug))
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_falls_back_to_warn() {
        if std::env::var_os(LOG_ENV).is_some() {
            return;
        }
        assert_eq!(build_filter("app=loud", false).to_string(), "warn");
        assert_eq!(build_filter("info", true).to_string(), "debug");
        assert_eq!(build_filter("info", false).to_string(), "info");
    }
}
