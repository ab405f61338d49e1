//! The request/response record shapes of the Request Facade's external contract (§6).
//!
//! Every type here is `Serialize`/`Deserialize`; [`crate::codec`] turns them into the opaque byte
//! blobs the facade's binary contract promises, using `serde_json` as the concrete stand-in for
//! whatever tagged binary format a real deployment would choose (documented in DESIGN.md).

use catalog_store::batch::{CatalogObject, RemovedObject};
use catalog_store::model::{Column, HdfsFileFormat, Partition, Table, TablePayload};
use catalog_store::version::ServiceId;
use serde::{Deserialize, Serialize};

/// An opaque request from an external query-layer client, as it arrives before planning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientRequest {
    pub principal: String,
    pub sql: String,
}

/// The planner-ready form of a [`ClientRequest`], produced by `create_exec_request`. The planner
/// itself is an external collaborator (§1); this crate only defines the seam and a test stub.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecRequest {
    pub principal: String,
    pub sql: String,
}

/// One reconciliation batch as it crosses the wire from the catalog service, mirroring
/// [`catalog_store::batch::CatalogUpdateBatch`] field-for-field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogUpdate {
    pub updated_objects: Vec<CatalogObject>,
    pub removed_objects: Vec<RemovedObject>,
    pub catalog_service_id: ServiceId,
}

/// The facade-level envelope around a [`CatalogUpdate`], published either by a broadcast listener
/// or by this process's own direct-DDL path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogUpdateRequest {
    pub update: CatalogUpdate,
}

/// Acknowledges a successfully applied [`CatalogUpdateRequest`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogUpdateResponse {
    pub catalog_service_id: ServiceId,
}

/// Parameters to `get_db_names`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetDbsParams {
    pub pattern: Option<String>,
}

/// Result of `get_db_names`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetDbsResult {
    pub names: Vec<String>,
}

/// Parameters to `get_table_names`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetTablesParams {
    pub db: String,
    pub pattern: Option<String>,
}

/// Result of `get_table_names`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetTablesResult {
    pub names: Vec<String>,
}

/// Parameters to `describe_table`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DescribeTableParams {
    pub db: String,
    pub table: String,
}

/// Result of `describe_table`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DescribeTableResult {
    pub table: Table,
}

/// The client-protocol metadata operations exposed through `exec_metadata_op` (§4.6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataOpKind {
    GetSchemas,
    GetTables,
    GetColumns,
    GetTypes,
}

/// Parameters to `exec_metadata_op`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetadataOpRequest {
    pub op: MetadataOpKind,
    pub db: Option<String>,
    pub table: Option<String>,
    pub pattern: Option<String>,
}

/// Result of `exec_metadata_op`: a flat list of rows, each a JSON object of column name to value,
/// mirroring the loosely-typed client-protocol metadata responses this stands in for.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetadataOpResponse {
    pub rows: Vec<serde_json::Value>,
}

/// The eight `ALTER TABLE` sub-operations of §4.6, as a tagged union.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlterTableParams {
    AddReplaceColumns { db: String, table: String, columns: Vec<Column>, replace_existing: bool },
    AddPartition { db: String, table: String, partition: Partition },
    DropColumn { db: String, table: String, column: String },
    ChangeColumn { db: String, table: String, old_name: String, new_column: Column },
    DropPartition { db: String, table: String, values: Vec<String> },
    RenameTable { db: String, table: String, new_db: String, new_table: String },
    SetFileFormat { db: String, table: String, format: HdfsFileFormat },
    SetLocation { db: String, table: String, location: String },
}

impl AlterTableParams {
    /// The (db, table) pair this alteration targets.
    pub fn target(&self) -> (&str, &str) {
        match self {
            AlterTableParams::AddReplaceColumns { db, table, .. }
            | AlterTableParams::AddPartition { db, table, .. }
            | AlterTableParams::DropColumn { db, table, .. }
            | AlterTableParams::ChangeColumn { db, table, .. }
            | AlterTableParams::DropPartition { db, table, .. }
            | AlterTableParams::RenameTable { db, table, .. }
            | AlterTableParams::SetFileFormat { db, table, .. }
            | AlterTableParams::SetLocation { db, table, .. } => (db, table),
        }
    }
}

/// Parameters to `create_database`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateDbParams {
    pub name: String,
    pub owner: String,
    pub comment: Option<String>,
    pub location: Option<String>,
    pub if_not_exists: bool,
}

/// Parameters to `create_table`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateTableParams {
    pub db: String,
    pub table: String,
    pub owner: String,
    pub columns: Vec<Column>,
    pub num_clustering_cols: usize,
    pub payload: TablePayload,
    pub if_not_exists: bool,
}

/// Parameters to `create_table_like`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateTableLikeParams {
    pub db: String,
    pub table: String,
    pub like_db: String,
    pub like_table: String,
    pub owner: String,
    pub if_not_exists: bool,
}

/// Parameters to `drop_database`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DropDbParams {
    pub name: String,
    pub if_exists: bool,
}

/// Parameters to `drop_table`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DropTableParams {
    pub db: String,
    pub table: String,
    pub if_exists: bool,
}
