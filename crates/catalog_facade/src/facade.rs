//! The Request Facade: the public surface consumed by the query layer (§4.6).

#[cfg(test)]
#[path = "facade_test.rs"]
mod facade_test;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use catalog_authz::{AuthorizationHandle, Privilege, PrivilegeRequest, Scope};
use catalog_store::batch::{CatalogObject, CatalogUpdateBatch, RemovedObject};
use catalog_store::model::{Database, IncompleteTableCause, Table};
use catalog_store::version::CatalogVersion;
use catalog_store::{CatalogReader, CatalogWriter};
use tracing::{info, warn};

use crate::hadoop_config::HadoopConfig;
use crate::metastore::MetaStorePool;
use crate::wire::{
    AlterTableParams, CreateDbParams, CreateTableLikeParams, CreateTableParams, DescribeTableResult,
    DropDbParams, DropTableParams, ExecRequest, MetadataOpKind, MetadataOpRequest, MetadataOpResponse,
};
use crate::FacadeError;

/// Direct-DDL versions are drawn from a range disjoint from whatever the catalog service assigns
/// to broadcasts, so a locally-assigned version can never collide with one arriving later over
/// the wire (see DESIGN.md).
const DIRECT_DDL_VERSION_BASE: u64 = 1 << 32;

/// The facade a query-executor process drives: catalog lookups, privilege enforcement, and DDL
/// dispatch, all funneled through the same [`CatalogReader`]/[`CatalogWriter`] pair.
pub struct CatalogFacade {
    reader: CatalogReader,
    writer: CatalogWriter,
    auth: AuthorizationHandle,
    metastore: MetaStorePool,
    hadoop_config: HadoopConfig,
    next_direct_version: AtomicU64,
}

impl CatalogFacade {
    /// Builds a facade over an already-open catalog, an authorization handle, and a metastore
    /// pool.
    pub fn new(
        reader: CatalogReader,
        writer: CatalogWriter,
        auth: AuthorizationHandle,
        metastore: MetaStorePool,
        hadoop_config: HadoopConfig,
    ) -> Self {
        CatalogFacade {
            reader,
            writer,
            auth,
            metastore,
            hadoop_config,
            next_direct_version: AtomicU64::new(DIRECT_DDL_VERSION_BASE),
        }
    }

    fn next_version(&self) -> CatalogVersion {
        CatalogVersion(self.next_direct_version.fetch_add(1, Ordering::SeqCst))
    }

    fn publish(&self, object: CatalogObject) -> Result<(), FacadeError> {
        self.apply(vec![object], vec![])
    }

    fn apply(
        &self,
        updated_objects: Vec<CatalogObject>,
        removed_objects: Vec<RemovedObject>,
    ) -> Result<(), FacadeError> {
        let service_id = self.reader.service_id();
        self.writer.apply_update(CatalogUpdateBatch { updated_objects, removed_objects, service_id })?;
        Ok(())
    }

    fn require(&self, principal: &str, privilege: Privilege, scope: Scope) -> Result<(), FacadeError> {
        self.auth.current().check_access(principal, &PrivilegeRequest::new(privilege, scope))?;
        Ok(())
    }

    // --- Planner bridge (§4.6): the planner itself is external; this is the seam. ---

    /// Delegates to the planner. This crate exposes only the seam; callers in tests drive it
    /// against a stub by constructing the `ExecRequest` directly.
    pub fn create_exec_request(&self, request: &crate::wire::ClientRequest) -> Result<ExecRequest, FacadeError> {
        Ok(ExecRequest { principal: request.principal.clone(), sql: request.sql.clone() })
    }

    /// Explains a request. Planning itself is external; this crate returns a placeholder
    /// description sufficient to exercise the seam in tests.
    pub fn explain(&self, request: &crate::wire::ClientRequest) -> Result<String, FacadeError> {
        Ok(format!("plan for: {}", request.sql))
    }

    // --- Name resolution and listing (§4.6) ---

    /// Lists database names matching `pattern`, filtered to those `principal` may view.
    pub fn get_db_names(&self, principal: &str, pattern: Option<&str>) -> Vec<String> {
        let checker = self.auth.current();
        self.reader
            .list_db_names(pattern)
            .into_iter()
            .filter(|name| {
                let request =
                    PrivilegeRequest::new(Privilege::ViewMetadata, Scope::Database(name.clone()));
                checker.has_access(principal, &request)
            })
            .collect()
    }

    /// Lists table names in `db` matching `pattern`, filtered to those `principal` may view.
    pub fn get_table_names(&self, principal: &str, db: &str, pattern: Option<&str>) -> Vec<String> {
        let checker = self.auth.current();
        self.reader
            .list_table_names(db, pattern)
            .into_iter()
            .filter(|name| {
                let request = PrivilegeRequest::new(
                    Privilege::ViewMetadata,
                    Scope::Table { db: db.to_string(), table: name.clone() },
                );
                checker.has_access(principal, &request)
            })
            .collect()
    }

    /// Describes a table. Fails with `TableLoading` if the cached record is
    /// [`catalog_store::model::TablePayload::Incomplete`] (§7: never at cache-population time,
    /// only here at access time).
    pub fn describe_table(
        &self,
        principal: &str,
        db: &str,
        table: &str,
    ) -> Result<DescribeTableResult, FacadeError> {
        self.require(
            principal,
            Privilege::ViewMetadata,
            Scope::Table { db: db.to_string(), table: table.to_string() },
        )?;
        let record = self
            .reader
            .get_table(db, table)
            .ok_or_else(|| FacadeError::TableNotFound { db: db.to_string(), table: table.to_string() })?;
        if let catalog_store::model::TablePayload::Incomplete { cause } = &record.payload {
            return Err(FacadeError::TableLoading {
                db: db.to_string(),
                table: table.to_string(),
                cause: cause.clone(),
            });
        }
        Ok(DescribeTableResult { table: record })
    }

    /// Client-protocol metadata operations (get-schemas, get-tables, get-columns, get-types),
    /// rendered as generic JSON rows (§4.6).
    pub fn exec_metadata_op(
        &self,
        principal: &str,
        request: &MetadataOpRequest,
    ) -> Result<MetadataOpResponse, FacadeError> {
        let rows = match request.op {
            MetadataOpKind::GetSchemas => self
                .get_db_names(principal, request.pattern.as_deref())
                .into_iter()
                .map(|name| serde_json::json!({ "TABLE_SCHEM": name }))
                .collect(),
            MetadataOpKind::GetTables => {
                let db = request.db.as_deref().unwrap_or_default();
                self.get_table_names(principal, db, request.pattern.as_deref())
                    .into_iter()
                    .map(|name| serde_json::json!({ "TABLE_SCHEM": db, "TABLE_NAME": name }))
                    .collect()
            }
            MetadataOpKind::GetColumns => {
                let db = request.db.as_deref().unwrap_or_default();
                let table = request.table.as_deref().unwrap_or_default();
                let described = self.describe_table(principal, db, table)?;
                described
                    .table
                    .columns
                    .iter()
                    .map(|column| {
                        serde_json::json!({
                            "TABLE_SCHEM": db,
                            "TABLE_NAME": table,
                            "COLUMN_NAME": column.name,
                            "TYPE_NAME": column.type_name,
                        })
                    })
                    .collect()
            }
            MetadataOpKind::GetTypes => {
                vec!["STRING", "BIGINT", "DOUBLE", "BOOLEAN", "TIMESTAMP"]
                    .into_iter()
                    .map(|name| serde_json::json!({ "TYPE_NAME": name }))
                    .collect()
            }
        };
        Ok(MetadataOpResponse { rows })
    }

    // --- DDL (§4.6): each call validates params, drives the metastore, then publishes a direct
    // update synthesized from the params (the version is locally assigned; see
    // DIRECT_DDL_VERSION_BASE above). ---

    /// Creates a database.
    pub async fn create_database(&self, principal: &str, params: CreateDbParams) -> Result<(), FacadeError> {
        self.require(principal, Privilege::Create, Scope::Server)?;
        if self.reader.get_db(&params.name).is_some() {
            if params.if_not_exists {
                return Ok(());
            }
            return Err(FacadeError::AlreadyExists(format!("database {}", params.name)));
        }
        let lease = self.metastore.lease().await;
        lease.create_database(&params)?;
        drop(lease);
        let mut record = Database::new(&params.name, &params.owner, self.next_version());
        record.comment = params.comment;
        record.location = params.location;
        self.publish(CatalogObject::Database(record))
    }

    /// Creates a table from an explicit schema.
    pub async fn create_table(&self, principal: &str, params: CreateTableParams) -> Result<(), FacadeError> {
        self.require(
            principal,
            Privilege::Create,
            Scope::Database(params.db.clone()),
        )?;
        if self.reader.get_db(&params.db).is_none() {
            return Err(FacadeError::DatabaseNotFound(params.db));
        }
        if self.reader.contains_table(&params.db, &params.table) {
            if params.if_not_exists {
                return Ok(());
            }
            return Err(FacadeError::AlreadyExists(format!("{}.{}", params.db, params.table)));
        }
        let lease = self.metastore.lease().await;
        lease.create_table(&params)?;
        drop(lease);
        let table = Table {
            table_id: self.next_version().0,
            db_name: params.db,
            name: params.table,
            owner: params.owner,
            columns: params.columns,
            num_clustering_cols: params.num_clustering_cols,
            version: self.next_version(),
            payload: params.payload,
        };
        self.publish(CatalogObject::Table(table))
    }

    /// Creates a table by copying another table's schema (`CREATE TABLE ... LIKE`).
    pub async fn create_table_like(
        &self,
        principal: &str,
        params: CreateTableLikeParams,
    ) -> Result<(), FacadeError> {
        self.require(principal, Privilege::Create, Scope::Database(params.db.clone()))?;
        let like = self.reader.get_table(&params.like_db, &params.like_table).ok_or_else(|| {
            FacadeError::TableNotFound { db: params.like_db.clone(), table: params.like_table.clone() }
        })?;
        if self.reader.contains_table(&params.db, &params.table) {
            if params.if_not_exists {
                return Ok(());
            }
            return Err(FacadeError::AlreadyExists(format!("{}.{}", params.db, params.table)));
        }
        let lease = self.metastore.lease().await;
        lease.create_table_like(&params)?;
        drop(lease);
        let table = Table {
            table_id: self.next_version().0,
            db_name: params.db,
            name: params.table,
            owner: params.owner,
            columns: like.columns,
            num_clustering_cols: like.num_clustering_cols,
            version: self.next_version(),
            payload: like.payload,
        };
        self.publish(CatalogObject::Table(table))
    }

    /// Drops a database.
    pub async fn drop_database(&self, principal: &str, params: DropDbParams) -> Result<(), FacadeError> {
        self.require(principal, Privilege::Drop, Scope::Database(params.name.clone()))?;
        if self.reader.get_db(&params.name).is_none() {
            if params.if_exists {
                return Ok(());
            }
            return Err(FacadeError::DatabaseNotFound(params.name));
        }
        let lease = self.metastore.lease().await;
        lease.drop_database(&params.name)?;
        drop(lease);
        self.apply(vec![], vec![RemovedObject::database(&params.name, self.next_version())])
    }

    /// Drops a table or view.
    pub async fn drop_table(&self, principal: &str, params: DropTableParams) -> Result<(), FacadeError> {
        self.require(
            principal,
            Privilege::Drop,
            Scope::Table { db: params.db.clone(), table: params.table.clone() },
        )?;
        if !self.reader.contains_table(&params.db, &params.table) {
            if params.if_exists {
                return Ok(());
            }
            return Err(FacadeError::TableNotFound { db: params.db, table: params.table });
        }
        let lease = self.metastore.lease().await;
        lease.drop_table(&params.db, &params.table)?;
        drop(lease);
        self.apply(vec![], vec![RemovedObject::table(&params.db, &params.table, self.next_version())])
    }

    /// Dispatches one of the eight `ALTER TABLE` sub-operations (§4.6). Unknown/unsupported
    /// variants cannot arise at the type level; this only fails for a missing target table.
    pub async fn alter_table(&self, principal: &str, params: AlterTableParams) -> Result<(), FacadeError> {
        let (db, table) = params.target();

        if let AlterTableParams::RenameTable { db, table, new_db, new_table } = &params {
            // A rename both removes the old name and adds the new one, so it needs DROP and
            // CREATE together on the source database (§4.4 `AllOf`); a cross-database rename
            // additionally needs CREATE on the destination.
            self.require(
                principal,
                Privilege::All,
                Scope::AllOf {
                    privileges: vec![Privilege::Drop, Privilege::Create],
                    scope: Box::new(Scope::Database(db.clone())),
                },
            )?;
            if new_db != db {
                self.require(principal, Privilege::Create, Scope::Database(new_db.clone()))?;
            }

            let lease = self.metastore.lease().await;
            lease.alter_table(&params)?;
            drop(lease);

            return self.rename_table(db, table, new_db, new_table);
        }

        self.require(
            principal,
            Privilege::All,
            Scope::Table { db: db.to_string(), table: table.to_string() },
        )?;

        let lease = self.metastore.lease().await;
        lease.alter_table(&params)?;
        drop(lease);

        let mut record = self
            .reader
            .get_table(db, table)
            .ok_or_else(|| FacadeError::TableNotFound { db: db.to_string(), table: table.to_string() })?;

        match params {
            AlterTableParams::AddReplaceColumns { columns, replace_existing, .. } => {
                if replace_existing {
                    record.columns = columns;
                } else {
                    record.columns.extend(columns);
                }
            }
            AlterTableParams::DropColumn { column, .. } => {
                record.columns.retain(|c| !c.name.eq_ignore_ascii_case(&column));
            }
            AlterTableParams::ChangeColumn { old_name, new_column, .. } => {
                if let Some(existing) =
                    record.columns.iter_mut().find(|c| c.name.eq_ignore_ascii_case(&old_name))
                {
                    *existing = new_column;
                }
            }
            AlterTableParams::AddPartition { partition, .. } => {
                if let catalog_store::model::TablePayload::Hdfs { partitions, .. } = &mut record.payload {
                    partitions.push(partition);
                }
            }
            AlterTableParams::DropPartition { values, .. } => {
                if let catalog_store::model::TablePayload::Hdfs { partitions, .. } = &mut record.payload {
                    partitions.retain(|p| p.values != values);
                }
            }
            AlterTableParams::SetFileFormat { format, .. } => {
                if let catalog_store::model::TablePayload::Hdfs { format: current, .. } = &mut record.payload {
                    *current = format;
                }
            }
            AlterTableParams::SetLocation { location, .. } => {
                if let catalog_store::model::TablePayload::Hdfs { location: current, .. } =
                    &mut record.payload
                {
                    *current = location;
                }
            }
            AlterTableParams::RenameTable { .. } => unreachable!("handled above"),
        }

        record.version = self.next_version();
        self.publish(CatalogObject::Table(record))
    }

    /// Models `RENAME_TABLE` as a drop-of-old + add-of-new pair sharing one version, applied as a
    /// single batch (§4.6, §9 design note).
    fn rename_table(&self, db: &str, table: &str, new_db: &str, new_table: &str) -> Result<(), FacadeError> {
        let mut record = self
            .reader
            .get_table(db, table)
            .ok_or_else(|| FacadeError::TableNotFound { db: db.to_string(), table: table.to_string() })?;
        let version = self.next_version();
        record.db_name = new_db.to_string();
        record.name = new_table.to_string();
        record.version = version;

        self.apply(
            vec![CatalogObject::Table(record)],
            vec![RemovedObject::table(db, table, version)],
        )
    }

    /// Reloads a single table's metadata from the metastore, publishing either the fresh record
    /// or, on failure, an `Incomplete` record carrying the cause (§7: surfaced lazily, never here).
    pub async fn reset_table(&self, db: &str, table: &str) -> Result<(), FacadeError> {
        let lease = self.metastore.lease().await;
        let version = self.next_version();
        let object = match lease.load_table(db, table) {
            Ok(mut loaded) => {
                loaded.version = version;
                CatalogObject::Table(loaded)
            }
            Err(error) => {
                warn!(%db, %table, %error, "metastore load failed, caching as incomplete");
                CatalogObject::Table(Table {
                    table_id: 0,
                    db_name: db.to_string(),
                    name: table.to_string(),
                    owner: String::new(),
                    columns: Vec::new(),
                    num_clustering_cols: 0,
                    version,
                    payload: catalog_store::model::TablePayload::Incomplete {
                        cause: Arc::new(IncompleteTableCause { message: error.to_string() }),
                    },
                })
            }
        };
        self.publish(object)
    }

    /// Invalidates and flushes the entire local cache (§4.6), requiring every subsequent lookup to
    /// be served by a fresh sync.
    pub fn reset_catalog(&self) {
        info!("administrative reset_catalog invoked");
        self.writer.force_flush();
    }

    /// Publishes a catalog update batch received over the wire (a broadcast, or a direct update
    /// forwarded from another process), returning the acknowledged service id.
    pub fn update_metastore(
        &self,
        batch: CatalogUpdateBatch,
    ) -> Result<catalog_store::version::ServiceId, FacadeError> {
        Ok(self.writer.apply_update(batch)?)
    }

    /// The host Hadoop-style configuration, rendered as text or HTML (§6).
    pub fn get_hadoop_config(&self, as_text: bool) -> String {
        if as_text {
            self.hadoop_config.render_text()
        } else {
            self.hadoop_config.render_html()
        }
    }

    /// A single Hadoop configuration value.
    pub fn get_hadoop_config_value(&self, key: &str) -> Option<String> {
        self.hadoop_config.value(key).map(str::to_string)
    }
}
