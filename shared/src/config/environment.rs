//! Deployment environment and logging settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::ConfigError;

/// Variable naming the deployment environment
pub const ENVIRONMENT_VAR: &str = "WARDEN_ENV";

/// Deployment environment, selecting built-in defaults and the default config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Environment named by `WARDEN_ENV`, `Development` when unset
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` if the variable holds an unknown name. A typo
    /// must not silently select development defaults.
    pub fn current() -> Result<Self, ConfigError> {
        match std::env::var(ENVIRONMENT_VAR) {
            Ok(name) => name.parse(),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// File read by [`AppConfig::load`](super::AppConfig::load) when no path is given
    pub fn default_file(&self) -> PathBuf {
        PathBuf::from("config").join(format!("{}.toml", self.as_str()))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::invalid(
                ENVIRONMENT_VAR,
                format!("unknown environment {:?}", other),
            )),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `warden_core=debug`
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// ANSI colors, pretty and compact formats only
    #[serde(default = "default_colored")]
    pub colored: bool,

    /// Include file and line of the event
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    /// Verbose human-readable output in development, json elsewhere
    pub fn for_environment(env: Environment) -> Self {
        let local = env == Environment::Development;
        let level = match env {
            Environment::Development => "debug",
            Environment::Staging => "info",
            Environment::Production => "warn",
        };

        Self {
            level: level.to_string(),
            format: if local { LogFormat::Pretty } else { LogFormat::Json },
            colored: local,
            source_location: local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_colored() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_names() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!(" Staging ".parse::<Environment>().unwrap(), Environment::Staging);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!(Environment::Production.to_string(), "production");

        let err = "prdo".parse::<Environment>().unwrap_err();
        assert!(err.to_string().contains(ENVIRONMENT_VAR));
    }

    #[test]
    fn test_default_file_per_environment() {
        assert_eq!(
            Environment::Staging.default_file(),
            PathBuf::from("config").join("staging.toml")
        );
        assert_ne!(
            Environment::Development.default_file(),
            Environment::Production.default_file()
        );
    }

    #[test]
    fn test_logging_config_for_environment() {
        let dev_log = LoggingConfig::for_environment(Environment::Development);
        assert_eq!(dev_log.level, "debug");
        assert_eq!(dev_log.format, LogFormat::Pretty);
        assert!(dev_log.colored);
        assert!(dev_log.source_location);

        let prod_log = LoggingConfig::for_environment(Environment::Production);
        assert_eq!(prod_log.level, "warn");
        assert_eq!(prod_log.format, LogFormat::Json);
        assert!(!prod_log.colored);
    }
}
