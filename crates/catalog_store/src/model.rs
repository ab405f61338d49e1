//! The catalog data model: databases, tables, functions, and the columns that make up a table.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::version::CatalogVersion;

/// A single column of a table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub type_name: String,
    pub comment: Option<String>,
}

/// The on-disk file format of an HDFS-backed table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HdfsFileFormat {
    Text,
    RcFile,
    Parquet,
    Sequence,
    Avro,
}

/// A single partition of an HDFS table, keyed by its partition-column values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    pub values: Vec<String>,
    pub location: String,
}

/// The kind-specific payload of a [`Table`], dispatched on by tag rather than by inheritance: the
/// only two operations that differ per kind (loading and building a plan-time descriptor) switch
/// on this enum instead of going through a vtable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TablePayload {
    Hdfs { format: HdfsFileFormat, row_format: Option<String>, partitions: Vec<Partition>, location: String },
    HBase { hbase_table_name: String },
    /// A table whose metadata failed to load. `cause` is surfaced lazily the next time the table
    /// is accessed (§7): never at cache-population time.
    Incomplete { cause: Arc<IncompleteTableCause> },
}

/// The reason an [`TablePayload::Incomplete`] table could not be loaded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct IncompleteTableCause {
    pub message: String,
}

/// A table or view. Tables and views are represented identically (§3); nothing in this struct
/// distinguishes them beyond whichever `TablePayload` variant a real view would use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub table_id: u64,
    pub db_name: String,
    pub name: String,
    pub owner: String,
    /// Ordered column list; the first `num_clustering_cols` entries are the clustering/partition
    /// columns (invariant I6).
    pub columns: Vec<Column>,
    pub num_clustering_cols: usize,
    pub version: CatalogVersion,
    pub payload: TablePayload,
}

impl Table {
    /// Case-insensitive column lookup (invariant I5), consistent with positional order.
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// The clustering (partition) columns, in order: positions `[0, num_clustering_cols)`.
    pub fn clustering_columns(&self) -> &[Column] {
        &self.columns[..self.num_clustering_cols]
    }

    /// True if this table is a placeholder for a load failure.
    pub fn is_incomplete(&self) -> bool {
        matches!(self.payload, TablePayload::Incomplete { .. })
    }
}

/// A user-defined function, keyed by its canonical signature within its owning database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub signature: String,
    pub db_name: String,
    pub version: CatalogVersion,
}

/// A database and its child tables/functions.
///
/// Tables and functions are owned by the `Database` they live in; a `Table` only holds its
/// database's *name*, not a pointer back to it (§9 "Parent/child ownership") — looking a table's
/// database up always goes back through the [`crate::object_store::ObjectStore`], so replacing a
/// `Database` record wholesale (as every update does, §3 "Lifecycle") never leaves a child
/// pointing at a stale parent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
    pub owner: String,
    pub comment: Option<String>,
    pub location: Option<String>,
    pub tables: BTreeMap<String, Table>,
    pub functions: BTreeMap<String, Function>,
    pub version: CatalogVersion,
}

impl Database {
    /// A fresh, empty database record at `version`.
    pub fn new(name: &str, owner: &str, version: CatalogVersion) -> Self {
        Database {
            name: name.to_string(),
            owner: owner.to_string(),
            comment: None,
            location: None,
            tables: BTreeMap::new(),
            functions: BTreeMap::new(),
            version,
        }
    }
}
