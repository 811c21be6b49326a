mod verifier_tests;

use std::sync::Arc;
use warden_shared::{KeyRingConfig, SigningAlgorithm, TokenConfig};

use crate::services::clock::ManualClock;
use crate::services::keyring::KeyRing;
use crate::services::revocation::RevocationStore;

use super::{HmacSigner, TokenIssuer, TokenVerifier};

pub(super) struct Fixture {
    pub clock: Arc<ManualClock>,
    pub key_ring: Arc<KeyRing>,
    pub revocations: Arc<RevocationStore>,
    pub issuer: TokenIssuer,
    pub verifier: TokenVerifier,
}

pub(super) fn fixture() -> Fixture {
    let clock = Arc::new(ManualClock::new(1000));
    let config = TokenConfig::default();
    let key_ring = Arc::new(
        KeyRing::new(
            vec![42u8; 32],
            SigningAlgorithm::HS256,
            config.max_ttl_secs,
            KeyRingConfig::default(),
            clock.clone(),
        )
        .unwrap(),
    );
    let revocations = Arc::new(RevocationStore::new(2 * config.max_ttl_secs));
    let signer = Arc::new(HmacSigner);

    Fixture {
        issuer: TokenIssuer::new(key_ring.clone(), signer.clone(), clock.clone(), &config),
        verifier: TokenVerifier::new(key_ring.clone(), revocations.clone(), signer, clock.clone()),
        clock,
        key_ring,
        revocations,
    }
}
