//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured level; `--verbose` forces debug.
//! Output goes to stderr so recommendation text on stdout stays clean.

use crate::config::LoggingConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("logging already initialised: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Filter directive for the given settings, without consulting the environment
pub fn filter_directive(config: &LoggingConfig, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        config.level.clone()
    }
}

/// Install the global subscriber
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<(), LoggingError> {
    let directive = filter_directive(config, verbose);
    let env_filter = match (verbose, EnvFilter::try_from_default_env()) {
        (false, Ok(filter)) => filter,
        _ => EnvFilter::try_new(&directive).map_err(|source| LoggingError::Filter {
            value: directive.clone(),
            source,
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if config.format == "compact" {
        builder.compact().try_init()
    } else {
        builder.pretty().try_init()
    };
    result.map_err(LoggingError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_forces_debug() {
        let config = LoggingConfig::default();
        assert_eq!(filter_directive(&config, true), "debug");
        assert_eq!(filter_directive(&config, false), "info");
    }

    #[test]
    fn test_invalid_directive_is_reported() {
        let config = LoggingConfig {
            level: "skitour=loud".to_string(),
            format: "compact".to_string(),
        };
        let err = EnvFilter::try_new(filter_directive(&config, false));
        assert!(err.is_err());
    }
}
