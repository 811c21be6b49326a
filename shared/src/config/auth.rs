//! Authentication core configuration
//!
//! Groups the tunables of the credential hasher, token issuer, key ring,
//! revocation store and background maintenance. All durations are seconds.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Password hashing algorithm used for new credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Bcrypt,
    Argon2,
}

impl HashAlgorithm {
    /// Longest secret the algorithm reads in full, if it has a limit
    pub fn secret_limit(self) -> Option<usize> {
        match self {
            HashAlgorithm::Bcrypt => Some(72),
            HashAlgorithm::Argon2 => None,
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithm::Bcrypt => write!(f, "bcrypt"),
            HashAlgorithm::Argon2 => write!(f, "argon2"),
        }
    }
}

/// HMAC algorithm used to sign session tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SigningAlgorithm {
    HS256,
    HS384,
    HS512,
}

impl SigningAlgorithm {
    /// Name written to the token header
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningAlgorithm::HS256 => "HS256",
            SigningAlgorithm::HS384 => "HS384",
            SigningAlgorithm::HS512 => "HS512",
        }
    }
}

impl std::str::FromStr for SigningAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HS256" => Ok(SigningAlgorithm::HS256),
            "HS384" => Ok(SigningAlgorithm::HS384),
            "HS512" => Ok(SigningAlgorithm::HS512),
            _ => Err(format!("Unsupported signing algorithm: {}", s)),
        }
    }
}

/// Credential hashing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HashingConfig {
    /// Algorithm for newly hashed credentials
    #[serde(default = "default_hash_algorithm")]
    pub algorithm: HashAlgorithm,

    /// Cost factor (bcrypt log rounds, or argon2 time cost)
    #[serde(default = "default_hash_cost")]
    pub cost: u32,

    /// Longest accepted secret in bytes
    #[serde(default = "default_max_secret_len")]
    pub max_secret_len: usize,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            algorithm: default_hash_algorithm(),
            cost: default_hash_cost(),
            max_secret_len: default_max_secret_len(),
        }
    }
}

/// Session token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// TTL applied when the caller does not pick one
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: i64,

    /// Upper bound on any requested TTL
    #[serde(default = "default_max_ttl_secs")]
    pub max_ttl_secs: i64,

    /// Signing algorithm for new keys
    #[serde(default = "default_signing_algorithm")]
    pub algorithm: SigningAlgorithm,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl_secs(),
            max_ttl_secs: default_max_ttl_secs(),
            algorithm: default_signing_algorithm(),
        }
    }
}

impl TokenConfig {
    /// Set the default TTL in minutes
    pub fn with_default_ttl_minutes(mut self, minutes: i64) -> Self {
        self.default_ttl_secs = minutes * 60;
        self
    }

    /// Set the maximum TTL in hours
    pub fn with_max_ttl_hours(mut self, hours: i64) -> Self {
        self.max_ttl_secs = hours * 3600;
        self
    }
}

/// Signing key ring configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeyRingConfig {
    /// Age after which the active key should be rotated (0 = never)
    #[serde(default = "default_rotation_interval_secs")]
    pub rotation_interval_secs: i64,

    /// Maximum number of retired keys kept for verification
    #[serde(default = "default_max_retired_keys")]
    pub max_retired_keys: usize,
}

impl Default for KeyRingConfig {
    fn default() -> Self {
        Self {
            rotation_interval_secs: default_rotation_interval_secs(),
            max_retired_keys: default_max_retired_keys(),
        }
    }
}

/// Revocation store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RevocationConfig {
    /// Longest time any revocation entry is retained
    #[serde(default = "default_retention_ceiling_secs")]
    pub retention_ceiling_secs: i64,
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            retention_ceiling_secs: default_retention_ceiling_secs(),
        }
    }
}

/// Background maintenance configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MaintenanceConfig {
    /// How often to purge keys, prune revocations and check rotation
    #[serde(default = "default_maintenance_interval_secs")]
    pub interval_secs: u64,

    /// Whether the background task runs at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_maintenance_interval_secs(),
            enabled: default_enabled(),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub hashing: HashingConfig,

    #[serde(default)]
    pub token: TokenConfig,

    #[serde(default)]
    pub keys: KeyRingConfig,

    #[serde(default)]
    pub revocation: RevocationConfig,

    #[serde(default)]
    pub maintenance: MaintenanceConfig,
}

impl AuthConfig {
    /// Check cross-field invariants
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cost_range = match self.hashing.algorithm {
            HashAlgorithm::Bcrypt => 4..=31,
            HashAlgorithm::Argon2 => 1..=u32::MAX,
        };
        if !cost_range.contains(&self.hashing.cost) {
            return Err(ConfigError::invalid(
                "auth.hashing.cost",
                format!("{} is outside the range accepted by {}", self.hashing.cost, self.hashing.algorithm),
            ));
        }
        if self.hashing.max_secret_len == 0 {
            return Err(ConfigError::invalid("auth.hashing.max_secret_len", "must be positive"));
        }
        if let Some(limit) = self.hashing.algorithm.secret_limit() {
            if self.hashing.max_secret_len > limit {
                return Err(ConfigError::invalid(
                    "auth.hashing.max_secret_len",
                    format!("{} reads at most {} bytes", self.hashing.algorithm, limit),
                ));
            }
        }
        if self.token.max_ttl_secs <= 0 {
            return Err(ConfigError::invalid("auth.token.max_ttl_secs", "must be positive"));
        }
        if self.token.default_ttl_secs <= 0 || self.token.default_ttl_secs > self.token.max_ttl_secs {
            return Err(ConfigError::invalid(
                "auth.token.default_ttl_secs",
                "must be positive and not exceed max_ttl_secs",
            ));
        }
        if self.keys.rotation_interval_secs < 0 {
            return Err(ConfigError::invalid("auth.keys.rotation_interval_secs", "must not be negative"));
        }
        // Entries must outlive the last second at which a covered token verifies.
        if self.revocation.retention_ceiling_secs <= self.token.max_ttl_secs {
            return Err(ConfigError::invalid(
                "auth.revocation.retention_ceiling_secs",
                "must exceed max_ttl_secs",
            ));
        }
        if self.maintenance.enabled && self.maintenance.interval_secs == 0 {
            return Err(ConfigError::invalid("auth.maintenance.interval_secs", "must be positive"));
        }
        Ok(())
    }
}

fn default_hash_algorithm() -> HashAlgorithm {
    HashAlgorithm::Bcrypt
}

fn default_hash_cost() -> u32 {
    10
}

fn default_max_secret_len() -> usize {
    72
}

fn default_ttl_secs() -> i64 {
    3600 // 1 hour
}

fn default_max_ttl_secs() -> i64 {
    86400 // 24 hours
}

fn default_signing_algorithm() -> SigningAlgorithm {
    SigningAlgorithm::HS256
}

fn default_rotation_interval_secs() -> i64 {
    604800 // 7 days
}

fn default_max_retired_keys() -> usize {
    3
}

fn default_retention_ceiling_secs() -> i64 {
    172800 // 48 hours
}

fn default_maintenance_interval_secs() -> u64 {
    300
}

fn default_enabled() -> bool {
    true
}
