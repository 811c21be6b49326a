//! Periodic maintenance of the key ring and revocation store
//!
//! Each cycle purges retired keys that can no longer verify anything,
//! prunes expired revocations and rotates the active key once it reaches
//! the configured age.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use warden_shared::MaintenanceConfig;

use crate::services::clock::Clock;
use crate::services::keyring::KeyRing;
use crate::services::revocation::RevocationStore;

/// Service running the maintenance cycle
pub struct MaintenanceService {
    key_ring: Arc<KeyRing>,
    revocations: Arc<RevocationStore>,
    clock: Arc<dyn Clock>,
    config: MaintenanceConfig,
}

impl MaintenanceService {
    pub fn new(
        key_ring: Arc<KeyRing>,
        revocations: Arc<RevocationStore>,
        clock: Arc<dyn Clock>,
        config: MaintenanceConfig,
    ) -> Self {
        Self {
            key_ring,
            revocations,
            clock,
            config,
        }
    }

    /// Run a single maintenance cycle
    ///
    /// A failing step is recorded in the result and does not stop the
    /// remaining steps.
    pub fn run_cycle(&self) -> MaintenanceResult {
        let now = self.clock.now();
        let mut result = MaintenanceResult::default();

        match self.key_ring.should_rotate(now) {
            Ok(true) => match self.key_ring.rotate_generated() {
                Ok(key_id) => result.rotated_key_id = Some(key_id),
                Err(e) => {
                    error!("Failed to rotate signing key: {}", e);
                    result.errors.push(format!("Key rotation error: {}", e));
                }
            },
            Ok(false) => {}
            Err(e) => {
                error!("Failed to check key age: {}", e);
                result.errors.push(format!("Key age check error: {}", e));
            }
        }

        match self.key_ring.purge_expired(now) {
            Ok(count) => result.keys_purged = count,
            Err(e) => {
                error!("Failed to purge signing keys: {}", e);
                result.errors.push(format!("Key purge error: {}", e));
            }
        }

        match self.revocations.prune_expired(now) {
            Ok(count) => result.revocations_pruned = count,
            Err(e) => {
                error!("Failed to prune revocations: {}", e);
                result.errors.push(format!("Revocation prune error: {}", e));
            }
        }

        info!(
            rotated = result.rotated_key_id.is_some(),
            keys_purged = result.keys_purged,
            revocations_pruned = result.revocations_pruned,
            "Maintenance cycle completed"
        );

        result
    }

    /// Start the maintenance cycle as a background task
    ///
    /// # Returns
    ///
    /// The task handle, or `None` if maintenance is disabled
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Background maintenance is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_secs);

        Some(tokio::spawn(async move {
            info!(
                "Maintenance service started - will run every {} seconds",
                self.config.interval_secs
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                let result = self.run_cycle();
                if !result.is_success() {
                    warn!("Maintenance completed with errors: {:?}", result.errors);
                }
            }
        }))
    }
}

/// Result of a maintenance cycle
#[derive(Debug, Default)]
pub struct MaintenanceResult {
    /// Id of the new active key if the cycle rotated
    pub rotated_key_id: Option<String>,
    pub keys_purged: usize,
    pub revocations_pruned: usize,
    /// Any errors encountered during the cycle
    pub errors: Vec<String>,
}

impl MaintenanceResult {
    /// Check if the cycle was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
