//! Error handling for the lanflux forwarder.

/// A specialized `Result` type for lanflux operations.
pub type Result<T> = std::result::Result<T, ForwardError>;

/// The main error type for fetching, encoding and writing device points.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Device payload was not valid JSON for the expected shape
    #[error("Failed to parse device payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value had a type line protocol cannot encode
    #[error("Invalid value type: {0}")]
    InvalidValueType(String),

    /// A device record violated the source contract
    #[error("Malformed device record: {0}")]
    MalformedRecord(String),

    /// The device source failed to produce records
    #[error("Device source error: {0}")]
    Source(String),

    /// The HTTP request never got a response
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// InfluxDB answered with a non-success status
    #[error("Write failed with status {status}: {body}")]
    WriteFailed {
        /// HTTP status code returned by the write endpoint
        status: u16,
        /// Response body, usually an InfluxDB JSON error document
        body: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ForwardError {
    /// Create a new invalid value type error
    pub fn invalid_value_type(msg: impl Into<String>) -> Self {
        Self::InvalidValueType(msg.into())
    }

    /// Create a new malformed record error
    pub fn malformed_record(msg: impl Into<String>) -> Self {
        Self::MalformedRecord(msg.into())
    }

    /// Create a new device source error
    pub fn source_error(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
