//! Error types
//!
//! `ToolError` enumerates every way a calculator can reject its input.
//! `ApiError` wraps it together with the request-level failures the router
//! detects before a calculator ever runs.

use hyper::StatusCode;
use thiserror::Error;

/// Calculator failure, reported to the client as `{"error": "<message>"}`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Insufficient parameters")]
    InsufficientParameters,

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid field '{field}': expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NonFinite,

    #[error("unsupported base {0}: base must be between 2 and 36")]
    UnsupportedBase(i64),

    #[error("invalid literal for base {base}: '{literal}'")]
    InvalidDigit { literal: String, base: u32 },

    #[error("value '{0}' is too large to convert")]
    Overflow(String),

    #[error("unknown filter type '{0}': expected 'lowpass' or 'highpass'")]
    UnknownFilterType(String),
}

/// Request-level failure surfaced by the router
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: u64 },

    #[error("Failed to read request body: {0}")]
    BodyRead(String),

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Tool(#[from] ToolError),
}

impl ApiError {
    /// HTTP status the error is reported with
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InvalidJson(_)
            | Self::NotAnObject
            | Self::BodyRead(_)
            | Self::Encode(_)
            | Self::Tool(_) => StatusCode::BAD_REQUEST,
        }
    }
}
