use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(weekgrid::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(weekgrid::config))]
    Config(String),

    #[error("Failed to fetch week events: {0}")]
    #[diagnostic(code(weekgrid::fetch))]
    Fetch(String),

    #[error("Events endpoint answered with HTTP {status}")]
    #[diagnostic(code(weekgrid::http_status))]
    HttpStatus { status: u16 },

    #[error("Invalid event timestamp: {0}")]
    #[diagnostic(code(weekgrid::timestamp))]
    Timestamp(String),

    #[error("Calendar error: {0}")]
    #[diagnostic(code(weekgrid::calendar))]
    Calendar(String),

    #[error(transparent)]
    #[diagnostic(code(weekgrid::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(weekgrid::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(weekgrid::other))]
    Other(String),
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type CalendarResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create fetch errors
pub fn fetch_error(message: &str) -> Error {
    Error::Fetch(message.to_string())
}

/// Helper to create timestamp errors
pub fn timestamp_error(message: &str) -> Error {
    Error::Timestamp(message.to_string())
}

/// Helper to create calendar (actor/mailbox) errors
pub fn calendar_error(message: &str) -> Error {
    Error::Calendar(message.to_string())
}
