//! Error types for the dimmer control panel.

/// Errors that can occur when talking to the dimmer service or building values.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{code} {reason}")]
    Status {
        /// Numeric HTTP status code.
        code: u16,
        /// Canonical reason phrase for the status.
        reason: String,
    },

    /// The service returned JSON that could not be parsed.
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// No device with this address is known to the registry.
    #[error("Unknown device address: {0}")]
    UnknownDevice(String),

    /// A value was outside the range accepted by the device API.
    #[error("Invalid {field} value {value} (expected {min}-{max})")]
    InvalidValue {
        /// The field name.
        field: &'static str,
        /// The invalid value provided.
        value: i64,
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
    },

    /// A light mode string that is not `main`, `rgb` or `off`.
    #[error("Unknown light mode: {0}")]
    UnknownMode(String),

    /// A picker surface was given a non-positive or non-finite dimension.
    #[error("Invalid surface dimension {0}")]
    InvalidGeometry(f64),

    /// The configured base URL could not be parsed.
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),
}
