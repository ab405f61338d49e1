//! The Policy Reloader: a periodic background task that re-reads the policy file and atomically
//! swaps the installed [`AuthorizationChecker`], grounded on the teacher ecosystem's
//! `spawn_storage_metrics_collector` periodic-task shape (loop, log-and-continue on failure,
//! `tokio::time::sleep`, `tracing::Instrument`).

#[cfg(test)]
#[path = "reloader_test.rs"]
mod reloader_test;

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug_span, info, warn, Instrument};

use crate::checker::AuthorizationChecker;
use crate::config::AuthorizationConfig;
use crate::policy::Policy;

/// A handle to the currently installed checker, shared between readers and the reload task.
///
/// This is the "Auth-checker lock" of the concurrency model: distinct from the catalog's own
/// lock, guarding only the `AuthorizationChecker` value, swapped wholesale on each successful
/// reload.
#[derive(Clone)]
pub struct AuthorizationHandle {
    inner: Arc<RwLock<AuthorizationChecker>>,
}

impl AuthorizationHandle {
    /// Wraps an initial checker in a shareable, reloadable handle.
    pub fn new(initial: AuthorizationChecker) -> Self {
        AuthorizationHandle { inner: Arc::new(RwLock::new(initial)) }
    }

    /// A handle that starts out denying everything, for use before the first load completes.
    pub fn empty() -> Self {
        AuthorizationHandle::new(AuthorizationChecker::empty())
    }

    /// A clone of the currently installed checker. Acquires the lock in shared mode only for the
    /// duration of the clone (§5).
    pub fn current(&self) -> AuthorizationChecker {
        self.inner.read().expect("auth-checker lock poisoned").clone()
    }

    /// Installs `checker`, replacing whatever was there. Acquires the lock exclusively only for
    /// the duration of the swap.
    pub fn install(&self, checker: AuthorizationChecker) {
        *self.inner.write().expect("auth-checker lock poisoned") = checker;
    }
}

fn load_policy(path: &PathBuf) -> std::io::Result<Policy> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(std::io::Error::from)
}

/// Spawns the periodic reload task described by §4.5: every `config.reload_interval_secs`
/// seconds, staggered by a uniform jitter in `[0, config.reload_jitter_secs)`, re-reads the
/// policy file and installs it into `handle`. On failure the previous checker is left in place
/// and the failure is logged; the next tick retries.
pub fn spawn_policy_reloader(config: AuthorizationConfig, handle: AuthorizationHandle) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            loop {
                let jitter = if config.reload_jitter_secs == 0 {
                    0
                } else {
                    rand::thread_rng().gen_range(0..config.reload_jitter_secs)
                };
                tokio::time::sleep(Duration::from_secs(config.reload_interval_secs + jitter)).await;

                match load_policy(&config.policy_file) {
                    Ok(policy) => {
                        handle.install(AuthorizationChecker::new(policy, config.enabled));
                        info!(
                            policy_file = %config.policy_file.display(),
                            enabled = config.enabled,
                            "policy reloaded"
                        );
                    }
                    Err(error) => {
                        warn!(
                            policy_file = %config.policy_file.display(),
                            %error,
                            "failed to reload policy, keeping previous checker installed"
                        );
                    }
                }
            }
        }
        .instrument(debug_span!("reload_authorization_policy")),
    )
}
