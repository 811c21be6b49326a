//! Shared error response structure and stable error codes
//!
//! Front ends (HTTP handlers, RPC adapters) render core errors through
//! [`ErrorResponse`]. Verification failures of any kind share a single code
//! so callers cannot tell which check rejected them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error response structure handed to external callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Error codes exposed at the boundary
pub mod error_codes {
    pub const NOT_AUTHENTICATED: &str = "NOT_AUTHENTICATED";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const CONFLICT: &str = "CONFLICT";
    pub const STORAGE_UNAVAILABLE: &str = "STORAGE_UNAVAILABLE";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Trait for converting errors to ErrorResponse
pub trait IntoErrorResponse {
    fn to_error_response(&self) -> ErrorResponse;
}
