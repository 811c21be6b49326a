//! Configuration module
//!
//! - `auth` - Credential hashing, token, key ring, revocation and maintenance settings
//! - `environment` - Environment detection and logging configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `WARDEN__`-prefixed environment variables (`__` separates nesting levels,
//! e.g. `WARDEN__AUTH__TOKEN__MAX_TTL_SECS=7200`).

pub mod auth;
pub mod environment;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub use auth::{
    AuthConfig, HashAlgorithm, HashingConfig, KeyRingConfig, MaintenanceConfig,
    RevocationConfig, SigningAlgorithm, TokenConfig,
};
pub use environment::{Environment, LogFormat, LoggingConfig, ENVIRONMENT_VAR};

/// Prefix of environment variables read by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "WARDEN";

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Authentication core configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    ///
    /// Uses the cheapest accepted bcrypt cost so local logins stay fast.
    pub fn development() -> Self {
        let mut auth = AuthConfig::default();
        auth.hashing.cost = 4;
        Self {
            environment: Environment::Development,
            auth,
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        let mut auth = AuthConfig::default();
        auth.hashing.cost = 12;
        Self {
            environment: Environment::Production,
            auth,
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Defaults for the environment named by `WARDEN_ENV`
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::production();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        }
    }

    /// Load configuration from a TOML file and the environment
    ///
    /// Without `path` the environment's [`default_file`](Environment::default_file)
    /// is read. A missing file is not an error; environment variables override
    /// file values. The result is validated before it is returned.
    ///
    /// # Errors
    ///
    /// * `ConfigError::Load` - A source could not be read or deserialized
    /// * `ConfigError::Invalid` - `WARDEN_ENV` is unknown or a cross-field
    ///   invariant does not hold
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let environment = Environment::current()?;
        let defaults = Self::for_environment(environment);
        let file = path.map_or_else(|| environment.default_file(), Path::to_path_buf);

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(config::File::from(file.as_path()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        tracing::debug!(
            environment = %config.environment,
            hash_algorithm = %config.auth.hashing.algorithm,
            signing_algorithm = config.auth.token.algorithm.as_str(),
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.auth.validate()
    }
}
