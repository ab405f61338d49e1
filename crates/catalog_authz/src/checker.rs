//! The Authorization Checker: evaluates privilege requests against a [`Policy`] snapshot.
//!
//! A `AuthorizationChecker` is an immutable value; hot-reloading is handled by swapping the
//! whole value under the handle's lock (see [`crate::reloader`]), never by mutating one in place.

#[cfg(test)]
#[path = "checker_test.rs"]
mod checker_test;

use crate::policy::Policy;
use crate::privilege::{Privilege, PrivilegeRequest, Scope};
use crate::AuthorizationError;

/// Evaluates [`PrivilegeRequest`]s against a fixed policy snapshot.
#[derive(Clone, Debug)]
pub struct AuthorizationChecker {
    policy: Policy,
    enabled: bool,
}

impl AuthorizationChecker {
    /// Builds a checker over `policy`. When `enabled` is `false`, every check passes regardless
    /// of `policy` (`AuthorizationConfig::enabled`, §4.4).
    pub fn new(policy: Policy, enabled: bool) -> Self {
        AuthorizationChecker { policy, enabled }
    }

    /// A checker that grants nothing, used before the first policy load completes. Enforcement
    /// stays on even if the eventual configuration disables it, since no config has been
    /// observed yet.
    pub fn empty() -> Self {
        AuthorizationChecker { policy: Policy::empty(), enabled: true }
    }

    /// The non-throwing form, used for list filtering (P8: `has_access` and `check_access` must
    /// agree).
    pub fn has_access(&self, principal: &str, request: &PrivilegeRequest) -> bool {
        if !self.enabled {
            return true;
        }
        self.scope_satisfied(principal, request.privilege, &request.scope)
    }

    /// The throwing form. The message distinguishes an access check (`ANY`/`ALL`/`VIEW_METADATA`)
    /// from an action check (§4.4, §7).
    pub fn check_access(
        &self,
        principal: &str,
        request: &PrivilegeRequest,
    ) -> Result<(), AuthorizationError> {
        if self.has_access(principal, request) {
            return Ok(());
        }
        if request.is_access_check() {
            Err(AuthorizationError::AccessDenied {
                principal: principal.to_string(),
                scope: request.scope.to_string(),
            })
        } else {
            Err(AuthorizationError::ActionDenied {
                principal: principal.to_string(),
                privilege: request.privilege.to_string(),
                scope: request.scope.to_string(),
            })
        }
    }

    fn scope_satisfied(&self, principal: &str, privilege: Privilege, scope: &Scope) -> bool {
        match scope {
            Scope::AllOf { privileges, scope: inner } => {
                privileges.iter().all(|&p| self.scope_satisfied(principal, p, inner))
            }
            Scope::AnyTable(db) => {
                self.held_on(principal, privilege, &Scope::Database(db.clone()))
                    || self.policy.grants.iter().any(|grant| {
                        grant.principal == principal
                            && matches!(&grant.scope, Scope::Table { db: d, .. } if d == db)
                            && grant.privileges.iter().any(|held| held.satisfies(privilege))
                    })
            }
            Scope::Column { db, table, .. } => {
                self.held_on(principal, privilege, scope)
                    || self.held_on(
                        principal,
                        privilege,
                        &Scope::Table { db: db.clone(), table: table.clone() },
                    )
                    || self.held_on(principal, privilege, &Scope::Database(db.clone()))
            }
            Scope::Table { db, .. } => {
                self.held_on(principal, privilege, scope)
                    || self.held_on(principal, privilege, &Scope::Database(db.clone()))
            }
            Scope::Database(_) | Scope::Server | Scope::Uri(_) => {
                self.held_on(principal, privilege, scope)
            }
        }
    }

    fn held_on(&self, principal: &str, privilege: Privilege, scope: &Scope) -> bool {
        self.policy
            .privileges_of(principal, scope)
            .into_iter()
            .any(|held| held.satisfies(privilege))
    }
}
