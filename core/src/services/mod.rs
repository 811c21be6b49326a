//! Business services containing domain logic and use cases.

pub mod auth;
pub mod clock;
pub mod credential;
pub mod keyring;
pub mod maintenance;
pub mod revocation;
pub mod token;

// Re-export commonly used types
pub use auth::AuthService;
pub use clock::{Clock, ManualClock, SystemClock, MICROS_PER_SEC};
pub use credential::{Argon2Strategy, BcryptStrategy, CredentialHasher, PasswordHashStrategy};
pub use keyring::KeyRing;
pub use maintenance::{MaintenanceResult, MaintenanceService};
pub use revocation::RevocationStore;
pub use token::{HmacSigner, TokenIssuer, TokenSigner, TokenVerifier};
