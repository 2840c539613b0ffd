//! Error types for the intake bot.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from the tabular backend (roster and submission sheets).
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Sheets API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse sheet data: {0}")]
    Parse(String),

    #[error("Submission row {index} does not exist")]
    RowOutOfRange { index: usize },
}

/// Outbound-messaging errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Failed to send message on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("Invalid message format: {0}")]
    InvalidMessage(String),
}

/// Errors in the accumulated intake itself.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Intake is missing required field: {0}")]
    MissingField(&'static str),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
