
use std::sync::Arc;
use warden_shared::{AuthConfig, HashAlgorithm};

use crate::repositories::{InMemoryCredentialRepository, InMemoryRevocationRepository};
use crate::services::auth::AuthService;
use crate::services::clock::{Clock, ManualClock};
use crate::services::keyring::KeyRing;

pub(super) type TestService = AuthService<InMemoryCredentialRepository, InMemoryRevocationRepository>;

pub(super) struct Harness {
    pub service: TestService,
    pub credentials: Arc<InMemoryCredentialRepository>,
    pub revocation_log: Arc<InMemoryRevocationRepository>,
    pub key_ring: Arc<KeyRing>,
    pub clock: Arc<ManualClock>,
}

pub(super) fn test_config() -> AuthConfig {
    let mut config = AuthConfig::default();
    config.hashing.algorithm = HashAlgorithm::Bcrypt;
    config.hashing.cost = 4;
    config
}

pub(super) fn harness() -> Harness {
    harness_with(test_config())
}

pub(super) fn harness_with(config: AuthConfig) -> Harness {
    let clock = Arc::new(ManualClock::new(1000));
    let key_ring = Arc::new(KeyRing::from_config(&config, clock.clone()).unwrap());
    build(
        config,
        Arc::new(InMemoryRevocationRepository::new()),
        key_ring,
        clock,
    )
}

/// Build a service over existing state, as after a restart
pub(super) fn build(
    config: AuthConfig,
    revocation_log: Arc<InMemoryRevocationRepository>,
    key_ring: Arc<KeyRing>,
    clock: Arc<ManualClock>,
) -> Harness {
    let credentials = Arc::new(InMemoryCredentialRepository::new());
    let service_clock: Arc<dyn Clock> = clock.clone();
    let service = AuthService::with_components(
        credentials.clone(),
        revocation_log.clone(),
        config,
        key_ring.clone(),
        service_clock,
    )
    .unwrap();

    Harness {
        service,
        credentials,
        revocation_log,
        key_ring,
        clock,
    }
}
