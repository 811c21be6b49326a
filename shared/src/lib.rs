//! Shared configuration and common types for the Warden authentication core
//!
//! This crate provides functionality used by every Warden crate:
//! - Configuration types and layered loading
//! - Error response structure and stable error codes
//! - Tracing subscriber initialisation

pub mod config;
pub mod errors;
pub mod telemetry;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigError, Environment, HashAlgorithm, HashingConfig,
    KeyRingConfig, LoggingConfig, MaintenanceConfig, RevocationConfig, SigningAlgorithm,
    TokenConfig,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use telemetry::init_tracing;
