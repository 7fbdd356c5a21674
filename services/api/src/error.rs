use std::fmt;

use job_portal::config::ConfigError;
use job_portal::telemetry::TelemetryError;
use job_portal::PortalError;

/// Startup and serve-loop failures for the api binary.
#[derive(Debug)]
pub enum ServeError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Store(PortalError),
    Io(std::io::Error),
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServeError::Config(err) => write!(f, "configuration error: {err}"),
            ServeError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            ServeError::Store(err) => write!(f, "store error: {err}"),
            ServeError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServeError::Config(err) => Some(err),
            ServeError::Telemetry(err) => Some(err),
            ServeError::Store(err) => Some(err),
            ServeError::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ServeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for ServeError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<PortalError> for ServeError {
    fn from(value: PortalError) -> Self {
        Self::Store(value)
    }
}

impl From<std::io::Error> for ServeError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
