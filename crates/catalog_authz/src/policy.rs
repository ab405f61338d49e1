//! The policy: a pure data object mapping principals to the privileges they hold on a scope.
//!
//! `Policy` has no decision logic of its own beyond exact-scope lookup — whether a `Database`
//! grant should cover a `Table` scope, or how `AnyTable`/`AllOf` resolve, is the
//! [`crate::checker::AuthorizationChecker`]'s job.

#[cfg(test)]
#[path = "policy_test.rs"]
mod policy_test;

use serde::{Deserialize, Serialize};

use crate::privilege::{Privilege, Scope};

/// A single grant: `principal` holds every privilege in `privileges` on `scope`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyGrant {
    pub principal: String,
    pub scope: Scope,
    pub privileges: Vec<Privilege>,
}

/// The full policy, as deserialized from the policy file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub grants: Vec<PolicyGrant>,
}

impl Policy {
    /// An empty policy: no principal holds any privilege on any scope.
    pub fn empty() -> Self {
        Policy::default()
    }

    /// The privileges `principal` holds on exactly `scope` — no subsumption across scope
    /// variants, and no case-folding of the principal name.
    pub fn privileges_of(&self, principal: &str, scope: &Scope) -> Vec<Privilege> {
        self.grants
            .iter()
            .filter(|grant| grant.principal == principal && &grant.scope == scope)
            .flat_map(|grant| grant.privileges.iter().copied())
            .collect()
    }
}
