//! The privilege lattice and the shape of an access request.

#[cfg(test)]
#[path = "privilege_test.rs"]
mod privilege_test;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A single privilege a principal may hold on a scope.
///
/// `All` subsumes every other privilege; `Any` is satisfied by holding any privilege at all on
/// the target scope, and is used by access checks (as opposed to action checks) such as
/// `VIEW_METADATA`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    All,
    Insert,
    Select,
    Create,
    Drop,
    ViewMetadata,
    Any,
}

impl Privilege {
    /// True if holding `self` satisfies a request for `requested`.
    pub fn satisfies(self, requested: Privilege) -> bool {
        self == Privilege::All || self == requested || requested == Privilege::Any
    }
}

impl Display for Privilege {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Privilege::All => "ALL",
            Privilege::Insert => "INSERT",
            Privilege::Select => "SELECT",
            Privilege::Create => "CREATE",
            Privilege::Drop => "DROP",
            Privilege::ViewMetadata => "VIEW_METADATA",
            Privilege::Any => "ANY",
        };
        write!(f, "{name}")
    }
}

/// The target of a privilege check.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Scope {
    Server,
    Database(String),
    Table { db: String, table: String },
    Column { db: String, table: String, column: String },
    Uri(String),
    AnyTable(String),
    /// Every privilege in `privileges` must hold on the single `scope` (§4.4) — e.g. a rename
    /// needing both `DROP` and `CREATE` on the same database.
    AllOf { privileges: Vec<Privilege>, scope: Box<Scope> },
}

impl Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Server => write!(f, "server"),
            Scope::Database(db) => write!(f, "database {db}"),
            Scope::Table { db, table } => write!(f, "table {db}.{table}"),
            Scope::Column { db, table, column } => write!(f, "column {db}.{table}.{column}"),
            Scope::Uri(uri) => write!(f, "uri {uri}"),
            Scope::AnyTable(db) => write!(f, "any table in {db}"),
            Scope::AllOf { privileges, scope } => {
                let rendered: Vec<String> = privileges.iter().map(Privilege::to_string).collect();
                write!(f, "{} on {scope}", rendered.join(" and "))
            }
        }
    }
}

/// True if a `Scope` check is an access check (distinguished in user-facing error messages,
/// see `catalog_authz::checker`) rather than an action check.
fn is_access_privilege(privilege: Privilege) -> bool {
    matches!(privilege, Privilege::Any | Privilege::All | Privilege::ViewMetadata)
}

/// A single privilege request: "does `privilege` hold on `scope`?"
#[derive(Clone, Debug, PartialEq)]
pub struct PrivilegeRequest {
    pub privilege: Privilege,
    pub scope: Scope,
}

impl PrivilegeRequest {
    /// Builds a new privilege request.
    pub fn new(privilege: Privilege, scope: Scope) -> Self {
        PrivilegeRequest { privilege, scope }
    }

    /// True if this is a metadata/visibility check rather than a data-mutating action check.
    pub fn is_access_check(&self) -> bool {
        is_access_privilege(self.privilege)
    }
}
