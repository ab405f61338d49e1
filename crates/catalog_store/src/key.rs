//! Object identity: the kinds of things the catalog tracks, and how each kind is keyed.

#[cfg(test)]
#[path = "key_test.rs"]
mod key_test;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The kind of a catalog object.
///
/// `Table` and `View` are tracked identically by the cache (§3); the distinction only matters to
/// callers that render the object back out. `CatalogMarker` carries no payload and exists only to
/// advance the last-synced watermark (§4.3 step 2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectKind {
    CatalogMarker,
    Database,
    Table,
    View,
    Function,
}

/// The identity of a catalog object, used as the key for both the
/// [`crate::object_store::ObjectStore`] and the [`crate::delta_log::DeltaLog`].
///
/// Database and table name components are lowercased at construction time so that lookups are
/// case-insensitive by construction (invariant I5) rather than by remembering to lowercase at
/// every call site.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKey {
    Database { db: String },
    Table { db: String, table: String },
    Function { db: String, signature: String },
}

impl ObjectKey {
    /// Builds the key for a database, lowercasing `name`.
    pub fn database(name: &str) -> Self {
        ObjectKey::Database { db: name.to_ascii_lowercase() }
    }

    /// Builds the key for a table or view, lowercasing both components.
    pub fn table(db: &str, table: &str) -> Self {
        ObjectKey::Table { db: db.to_ascii_lowercase(), table: table.to_ascii_lowercase() }
    }

    /// Builds the key for a function. `signature` is the already-canonicalized name+argument-type
    /// encoding and is lowercased for consistency with the other variants.
    pub fn function(db: &str, signature: &str) -> Self {
        ObjectKey::Function { db: db.to_ascii_lowercase(), signature: signature.to_ascii_lowercase() }
    }

    /// The lowercased owning database name, for every variant that has one.
    pub fn db_name(&self) -> &str {
        match self {
            ObjectKey::Database { db } => db,
            ObjectKey::Table { db, .. } => db,
            ObjectKey::Function { db, .. } => db,
        }
    }
}

impl Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKey::Database { db } => write!(f, "{db}"),
            ObjectKey::Table { db, table } => write!(f, "{db}.{table}"),
            ObjectKey::Function { db, signature } => write!(f, "{db}.{signature}"),
        }
    }
}
