use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to install the tracing subscriber: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global subscriber: compact lines, no colour, no target.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = select_filter(rust_log.as_deref(), &config.log_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

/// A usable `RUST_LOG` wins; a blank or unparseable one falls back to the configured level,
/// which must itself parse.
fn select_filter(rust_log: Option<&str>, log_level: &str) -> Result<EnvFilter, TelemetryError> {
    if let Some(filter) = rust_log
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
    {
        return Ok(filter);
    }

    EnvFilter::try_new(log_level).map_err(|source| TelemetryError::EnvFilter {
        value: log_level.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_accepts_directives() {
        let filter = select_filter(None, "info,dinewise=debug").expect("filter builds");
        assert!(filter.to_string().contains("dinewise=debug"));
    }

    #[test]
    fn rust_log_overrides_the_configured_level() {
        let filter = select_filter(Some("warn"), "dinewise=loud").expect("filter builds");
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn unusable_rust_log_falls_back_to_the_configured_level() {
        let filter = select_filter(Some("dinewise=loud"), "debug").expect("filter builds");
        assert_eq!(filter.to_string(), "debug");
        assert!(select_filter(Some("  "), "info").is_ok());
    }

    #[test]
    fn reports_unparseable_configured_levels() {
        match select_filter(None, "dinewise=loud") {
            Err(TelemetryError::EnvFilter { value, .. }) => assert_eq!(value, "dinewise=loud"),
            other => panic!("expected filter error, got {other:?}"),
        }
    }
}
