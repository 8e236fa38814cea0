//! Logging initialisation.

use tracing::warn;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Builds the filter from `RUST_LOG` plus the configured directives.
///
/// Returns the filter and any directives that failed to parse.
pub fn build_filter(config: &LoggingConfig) -> (EnvFilter, Vec<String>) {
    let mut filter = EnvFilter::from_default_env();
    let mut rejected = Vec::new();

    for part in config.filter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.parse::<Directive>() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(_) => rejected.push(part.to_string()),
        }
    }

    (filter, rejected)
}

/// Installs the global subscriber.
///
/// Returns `false` if a subscriber was already installed, in which case
/// nothing changes.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let (filter, rejected) = build_filter(config);

    let installed = match config.format {
        LogFormat::Plain => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .try_init()
            .is_ok(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .try_init()
            .is_ok(),
    };

    for directive in rejected {
        warn!("Ignoring invalid log directive '{}'", directive);
    }

    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_rejects_invalid_directives() {
        let config = LoggingConfig {
            filter: "slotcraft=debug, slotcraft_engine=loud,".to_string(),
            format: LogFormat::Plain,
        };
        let (_, rejected) = build_filter(&config);
        assert_eq!(rejected, vec!["slotcraft_engine=loud".to_string()]);
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        let config = LoggingConfig::default();
        init_logging(&config);
        assert!(!init_logging(&config));
    }
}
