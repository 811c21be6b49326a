//! Main authentication service implementation

use std::sync::Arc;
use tracing::{debug, info, warn};
use warden_shared::AuthConfig;

use crate::domain::entities::credential::Credential;
use crate::domain::entities::revocation::{RevocationEntry, RevocationTarget};
use crate::domain::entities::token::{Claims, IssuedToken, VerifiedToken};
use crate::errors::{AuthError, CredentialError, DomainError, DomainResult};
use crate::repositories::{CredentialRepository, RevocationRepository};
use crate::services::clock::{Clock, SystemClock};
use crate::services::credential::CredentialHasher;
use crate::services::keyring::KeyRing;
use crate::services::maintenance::MaintenanceService;
use crate::services::revocation::RevocationStore;
use crate::services::token::{HmacSigner, TokenIssuer, TokenSigner, TokenVerifier};

/// Authentication service wiring the core components to persistence
///
/// Every credential or token check that fails is reported to the caller as
/// `AuthError::NotAuthenticated`; the specific reason is only logged.
pub struct AuthService<C, R>
where
    C: CredentialRepository,
    R: RevocationRepository,
{
    /// Credential persistence
    credentials: Arc<C>,
    /// Durable revocation log
    revocation_log: Arc<R>,
    hasher: Arc<CredentialHasher>,
    key_ring: Arc<KeyRing>,
    revocations: Arc<RevocationStore>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    clock: Arc<dyn Clock>,
    config: AuthConfig,
}

impl<C, R> AuthService<C, R>
where
    C: CredentialRepository,
    R: RevocationRepository,
{
    /// Create a service with a freshly generated signing key and the wall clock
    ///
    /// # Arguments
    ///
    /// * `credentials` - Repository for credential persistence
    /// * `revocation_log` - Repository for durable revocations
    /// * `config` - Authentication configuration
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not validate.
    pub fn new(credentials: Arc<C>, revocation_log: Arc<R>, config: AuthConfig) -> DomainResult<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
        let key_ring = Arc::new(KeyRing::from_config(&config, Arc::clone(&clock))?);
        Self::with_components(credentials, revocation_log, config, key_ring, clock)
    }

    /// Create a service around an existing key ring and clock
    pub fn with_components(
        credentials: Arc<C>,
        revocation_log: Arc<R>,
        config: AuthConfig,
        key_ring: Arc<KeyRing>,
        clock: Arc<dyn Clock>,
    ) -> DomainResult<Self> {
        config.validate()?;

        let hasher = Arc::new(CredentialHasher::new(&config.hashing)?);
        let revocations = Arc::new(RevocationStore::new(config.revocation.retention_ceiling_secs));
        let signer: Arc<dyn TokenSigner> = Arc::new(HmacSigner);

        let issuer = TokenIssuer::new(
            Arc::clone(&key_ring),
            Arc::clone(&signer),
            Arc::clone(&clock),
            &config.token,
        );
        let verifier = TokenVerifier::new(
            Arc::clone(&key_ring),
            Arc::clone(&revocations),
            signer,
            Arc::clone(&clock),
        );

        Ok(Self {
            credentials,
            revocation_log,
            hasher,
            key_ring,
            revocations,
            issuer,
            verifier,
            clock,
            config,
        })
    }

    pub fn key_ring(&self) -> &Arc<KeyRing> {
        &self.key_ring
    }

    pub fn revocations(&self) -> &Arc<RevocationStore> {
        &self.revocations
    }

    /// Maintenance service over this instance's key ring and revocations
    pub fn maintenance(&self) -> MaintenanceService {
        MaintenanceService::new(
            Arc::clone(&self.key_ring),
            Arc::clone(&self.revocations),
            Arc::clone(&self.clock),
            self.config.maintenance.clone(),
        )
    }

    /// Load persisted revocations into the in-memory store
    ///
    /// Call once at startup before serving requests.
    ///
    /// # Returns
    ///
    /// Number of live entries restored
    pub async fn restore(&self) -> DomainResult<usize> {
        let entries = self.revocation_log.load_revocations().await?;
        let total = entries.len();
        let restored = self.revocations.restore(entries, self.clock.now())?;

        info!(total, restored, "Revocations restored");
        Ok(restored)
    }

    /// Store a credential for a new subject
    ///
    /// # Errors
    ///
    /// * `AuthError::CredentialAlreadyExists` - The subject already has one
    /// * `CredentialError::InvalidInput` - Empty subject, empty or oversized secret
    pub async fn register_credential(&self, subject_id: &str, secret: &[u8]) -> DomainResult<()> {
        Self::check_subject(subject_id)?;
        // Skips the hashing work for the common duplicate case.
        if self.credentials.load_credential(subject_id).await?.is_some() {
            return Err(AuthError::CredentialAlreadyExists.into());
        }

        let credential = self.create_credential(subject_id, secret).await?;
        if !self.credentials.insert_credential(credential).await? {
            return Err(AuthError::CredentialAlreadyExists.into());
        }

        info!(subject_id, "Credential registered");
        Ok(())
    }

    /// Register a subject and issue its first session token
    pub async fn register(
        &self,
        subject_id: &str,
        secret: &[u8],
        claims: Claims,
    ) -> DomainResult<IssuedToken> {
        self.register_credential(subject_id, secret).await?;
        self.issuer.issue_default(subject_id, claims)
    }

    /// Replace a subject's secret and revoke all of its tokens
    ///
    /// The current secret must verify first. The revocation is durable before
    /// the new hash is stored, so a storage failure never leaves the old
    /// tokens valid under a changed secret.
    pub async fn change_credential(
        &self,
        subject_id: &str,
        current_secret: &[u8],
        new_secret: &[u8],
    ) -> DomainResult<()> {
        let credential = Self::collapse(
            self.check_credential(subject_id, current_secret).await,
            "change_credential",
        )?;

        let replacement = self.create_credential(&credential.subject_id, new_secret).await?;
        self.revoke_subject(subject_id).await?;
        self.credentials.save_credential(replacement).await?;
        // Also revokes logins that used the old secret while the hash was swapped.
        self.revoke_subject(subject_id).await?;

        info!(subject_id, "Credential changed");
        Ok(())
    }

    /// Check a subject's secret
    ///
    /// Unknown subjects and wrong secrets are indistinguishable to the
    /// caller, in outcome and in the work spent. A hash produced with
    /// outdated settings is upgraded after a successful check.
    ///
    /// # Errors
    ///
    /// * `AuthError::NotAuthenticated` - Unknown subject or wrong secret
    /// * `DomainError::StorageUnavailable` - The credential could not be loaded
    pub async fn verify_credential(&self, subject_id: &str, secret: &[u8]) -> DomainResult<()> {
        let credential = Self::collapse(
            self.check_credential(subject_id, secret).await,
            "verify_credential",
        )?;
        self.upgrade_hash(credential, secret).await;
        Ok(())
    }

    /// Verify a secret and issue a session token with the default TTL
    pub async fn login(
        &self,
        subject_id: &str,
        secret: &[u8],
        claims: Claims,
    ) -> DomainResult<IssuedToken> {
        self.verify_credential(subject_id, secret).await?;
        let issued = self.issuer.issue_default(subject_id, claims)?;

        info!(subject_id, token_id = %issued.token_id, "Login succeeded");
        Ok(issued)
    }

    /// Issue a session token for an already authenticated subject
    pub fn issue_session_token(
        &self,
        subject_id: &str,
        claims: Claims,
        ttl_secs: i64,
    ) -> DomainResult<IssuedToken> {
        self.issuer.issue(subject_id, claims, ttl_secs)
    }

    /// Verify a presented session token
    pub async fn verify_session_token(&self, token: &str) -> DomainResult<VerifiedToken> {
        Self::collapse(self.verifier.verify(token), "verify_session_token")
    }

    /// Revoke a single session token until it would have expired
    ///
    /// The revocation is durable before this returns. Revoking a token that
    /// is already revoked is a no-op.
    pub async fn revoke_session(&self, token: &str) -> DomainResult<()> {
        let now = self.clock.now();
        let payload = Self::collapse(self.verifier.authenticate_at(token, now), "revoke_session")?;

        let target = RevocationTarget::Token(payload.jti.clone());
        if self.revocations.is_revoked(&target, now)? {
            debug!(token_id = %payload.jti, "Session already revoked");
            return Ok(());
        }

        // Live through the token's last valid second.
        let entry = RevocationEntry::new(target, self.clock.stamp(), payload.exp + 1);
        self.persist_revocation(entry, now).await?;

        info!(subject_id = %payload.sub, token_id = %payload.jti, "Session revoked");
        Ok(())
    }

    /// Revoke every token issued to a subject up to now
    ///
    /// Tokens issued after this call, even within the same second, stay valid.
    pub async fn revoke_subject(&self, subject_id: &str) -> DomainResult<()> {
        Self::check_subject(subject_id)?;
        let now = self.clock.now();
        let entry = RevocationEntry::new(
            RevocationTarget::Subject(subject_id.to_string()),
            self.clock.stamp(),
            now + self.issuer.max_ttl() + 1,
        );
        self.persist_revocation(entry, now).await?;

        info!(subject_id, "All sessions of subject revoked");
        Ok(())
    }

    fn check_subject(subject_id: &str) -> DomainResult<()> {
        if subject_id.is_empty() {
            return Err(CredentialError::InvalidInput {
                reason: "subject must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn persist_revocation(&self, entry: RevocationEntry, now: i64) -> DomainResult<()> {
        self.revocation_log.append_revocation(entry.clone()).await?;
        self.revocations.revoke(entry, now)?;
        Ok(())
    }

    /// Load and verify a credential, failing with the specific reason
    async fn check_credential(&self, subject_id: &str, secret: &[u8]) -> DomainResult<Credential> {
        // Rejected before the lookup so the outcome does not depend on the subject.
        self.hasher.check_secret(secret)?;
        let secret_owned = secret.to_vec();

        let Some(credential) = self.credentials.load_credential(subject_id).await? else {
            self.run_blocking(move |hasher| {
                hasher.verify_dummy(&secret_owned);
                Ok(())
            })
            .await?;
            debug!(subject_id, reason = "unknown subject", "Credential rejected");
            return Err(AuthError::NotAuthenticated.into());
        };

        let stored = credential.stored_hash().to_string();
        let matched = self
            .run_blocking(move |hasher| hasher.verify(&secret_owned, &stored))
            .await?;
        if !matched {
            debug!(subject_id, reason = "secret mismatch", "Credential rejected");
            return Err(AuthError::NotAuthenticated.into());
        }

        Ok(credential)
    }

    /// Rehash with current settings if needed; failures are logged only
    async fn upgrade_hash(&self, credential: Credential, secret: &[u8]) {
        match self.hasher.needs_rehash(credential.stored_hash()) {
            Ok(false) => return,
            Ok(true) => {}
            Err(e) => {
                warn!(subject_id = %credential.subject_id, error = %e, "Failed to inspect stored hash");
                return;
            }
        }

        let subject_id = credential.subject_id.clone();
        let result = match self.create_credential(&subject_id, secret).await {
            Ok(upgraded) => self.credentials.save_credential(upgraded).await.map_err(DomainError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => info!(
                subject_id = %subject_id,
                algorithm = %self.hasher.algorithm(),
                cost = self.hasher.cost(),
                "Credential hash upgraded"
            ),
            Err(e) => warn!(subject_id = %subject_id, error = %e, "Failed to upgrade credential hash"),
        }
    }

    async fn create_credential(&self, subject_id: &str, secret: &[u8]) -> DomainResult<Credential> {
        let subject_id = subject_id.to_string();
        let secret = secret.to_vec();
        self.run_blocking(move |hasher| hasher.create_credential(&subject_id, &secret))
            .await
    }

    /// Run CPU-bound hashing on the blocking pool
    async fn run_blocking<T, F>(&self, task: F) -> DomainResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&CredentialHasher) -> DomainResult<T> + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || task(&hasher))
            .await
            .map_err(|e| DomainError::internal(format!("Hashing task failed: {}", e)))?
    }

    /// Replace verification failures with `NotAuthenticated`, logging the reason
    fn collapse<T>(result: DomainResult<T>, operation: &'static str) -> DomainResult<T> {
        result.map_err(|error| {
            if !error.is_verification_failure() {
                return error;
            }
            match error {
                DomainError::Auth(AuthError::NotAuthenticated) => {}
                DomainError::Credential(CredentialError::MalformedHash) => {
                    warn!(operation, reason = %error, "Stored credential hash is malformed")
                }
                _ => debug!(operation, reason = %error, "Verification failed"),
            }
            AuthError::NotAuthenticated.into()
        })
    }
}
