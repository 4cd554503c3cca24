use crate::config::ConfigError;
use crate::questionnaire::rules::MalformedRuleError;
use crate::telemetry::TelemetryError;
use std::fmt;

/// Failures that end a command before or outside request handling. Request-level failures are
/// mapped to HTTP responses by the questionnaire router instead.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    /// The rule table could not be loaded; nothing is served.
    Rules(MalformedRuleError),
    CheckFailed { failed: usize, total: usize },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Rules(err) => write!(f, "rule base error: {err}"),
            AppError::CheckFailed { failed, total } => {
                write!(f, "self-check failed: {failed} of {total} scenarios")
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Rules(err) => Some(err),
            AppError::CheckFailed { .. } => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<MalformedRuleError> for AppError {
    fn from(value: MalformedRuleError) -> Self {
        Self::Rules(value)
    }
}
