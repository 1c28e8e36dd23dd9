//! Error types for the URL codec
//!
//! Errors fall into three families callers need to tell apart without
//! matching on message text:
//! - malformed input (bad key, bad value, unterminated group)
//! - expired URLs (`expires=` not after the current time)
//! - invalid signatures (bad version prefix, bad base64, HMAC mismatch)

use thiserror::Error;

/// Errors returned while parsing, verifying or configuring
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FluxError {
    /// A parameter or the parameter block itself could not be decoded
    #[error("imageflux: invalid {param}: {message}")]
    Malformed { param: String, message: String },

    /// The `expires` parameter is not strictly in the future
    #[error("imageflux: expired")]
    Expired,

    /// The signature is missing, has an unsupported version, or does not match
    #[error("imageflux: invalid signature")]
    InvalidSignature,

    /// Proxy configuration could not be loaded or is invalid
    #[error("imageflux: configuration error: {0}")]
    Config(String),
}

impl FluxError {
    /// Maps codec errors to the HTTP status a serving proxy would answer with
    ///
    /// Status mapping:
    /// - Malformed → 400 (Bad Request)
    /// - Expired → 410 (Gone)
    /// - InvalidSignature → 403 (Forbidden)
    /// - Config → 500 (Internal Server Error)
    pub fn to_http_status(&self) -> u16 {
        match self {
            FluxError::Malformed { .. } => 400,
            FluxError::Expired => 410,
            FluxError::InvalidSignature => 403,
            FluxError::Config(_) => 500,
        }
    }

    pub fn malformed(param: impl Into<String>, message: impl Into<String>) -> Self {
        FluxError::Malformed {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Malformed-value error quoting the offending value
    pub fn invalid_value(param: impl Into<String>, value: &str) -> Self {
        FluxError::Malformed {
            param: param.into(),
            message: format!("{:?}", value),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        FluxError::Config(message.into())
    }

    /// Returns true for errors caused by untrusted input rather than setup
    pub fn is_client_error(&self) -> bool {
        !matches!(self, FluxError::Config(_))
    }
}
