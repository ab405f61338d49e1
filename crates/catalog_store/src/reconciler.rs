//! The Update Reconciler: the serialization point where a broadcast or direct-DDL batch is
//! applied to the [`ObjectStore`] and [`DeltaLog`] atomically, and the reader/writer split that
//! the rest of the crate is consumed through.

#[cfg(test)]
#[path = "reconciler_test.rs"]
mod reconciler_test;

use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::batch::{CatalogObject, CatalogUpdateBatch};
use crate::delta_log::DeltaLog;
use crate::key::ObjectKey;
use crate::model::{Database, Function, Table};
use crate::object_store::ObjectStore;
use crate::version::{CatalogVersion, ServiceId};
use crate::CatalogError;

struct CatalogInner {
    store: ObjectStore,
    delta_log: DeltaLog,
    service_id: ServiceId,
    last_synced: CatalogVersion,
    ready: bool,
}

impl CatalogInner {
    fn new() -> Self {
        CatalogInner {
            store: ObjectStore::new(),
            delta_log: DeltaLog::new(),
            service_id: ServiceId::UNKNOWN,
            last_synced: CatalogVersion::NONE,
            ready: false,
        }
    }

    /// Drops all cached state back to first-boot shape, keeping the lock domain consistent
    /// (§4.3 step 1).
    fn flush(&mut self) {
        self.store.clear();
        self.delta_log.clear();
        self.last_synced = CatalogVersion::NONE;
        self.service_id = ServiceId::UNKNOWN;
        self.ready = false;
    }
}

/// Builds a fresh, empty catalog and returns its reader and writer halves, both backed by the
/// same lock domain (§5 "Catalog lock").
pub fn open_catalog() -> (CatalogReader, CatalogWriter) {
    let inner = Arc::new(RwLock::new(CatalogInner::new()));
    (CatalogReader { inner: inner.clone() }, CatalogWriter { inner })
}

/// The read-only half of the catalog, held by query planning and every lookup path. Every method
/// acquires the Catalog lock in shared mode for the duration of the call (§5).
#[derive(Clone)]
pub struct CatalogReader {
    inner: Arc<RwLock<CatalogInner>>,
}

impl CatalogReader {
    /// Looks up a database by name, case-insensitively.
    pub fn get_db(&self, name: &str) -> Option<Database> {
        self.inner.read().expect("catalog lock poisoned").store.get_db(name).cloned()
    }

    /// True iff `db` has a table or view named `table`.
    pub fn contains_table(&self, db: &str, table: &str) -> bool {
        self.inner.read().expect("catalog lock poisoned").store.contains_table(db, table)
    }

    /// Looks up a table by (db, name). See [`ObjectStore::get_table`] for incomplete-table
    /// semantics (§7): the caller must inspect [`Table::is_incomplete`].
    pub fn get_table(&self, db: &str, table: &str) -> Option<Table> {
        self.inner.read().expect("catalog lock poisoned").store.get_table(db, table).cloned()
    }

    /// Lists database names matching `pattern` (§6).
    pub fn list_db_names(&self, pattern: Option<&str>) -> Vec<String> {
        self.inner.read().expect("catalog lock poisoned").store.list_db_names(pattern)
    }

    /// Lists table names in `db` matching `pattern` (§6).
    pub fn list_table_names(&self, db: &str, pattern: Option<&str>) -> Vec<String> {
        self.inner.read().expect("catalog lock poisoned").store.list_table_names(db, pattern)
    }

    /// The identity of the catalog service this cache is currently synced against.
    pub fn service_id(&self) -> ServiceId {
        self.inner.read().expect("catalog lock poisoned").service_id
    }

    /// The version of the last successfully applied batch.
    pub fn last_synced_version(&self) -> CatalogVersion {
        self.inner.read().expect("catalog lock poisoned").last_synced
    }

    /// True once the first batch has been successfully applied (§4.3 step 7), for readiness
    /// probes.
    pub fn is_ready(&self) -> bool {
        self.inner.read().expect("catalog lock poisoned").ready
    }
}

/// The exclusive-write half of the catalog, held by the reconciliation path. There is at most one
/// `CatalogWriter` per catalog in practice, following the same single-writer convention as the
/// reader/writer split below, though nothing here prevents cloning it — callers serialize through the lock
/// regardless.
#[derive(Clone)]
pub struct CatalogWriter {
    inner: Arc<RwLock<CatalogInner>>,
}

impl CatalogWriter {
    /// Administratively flushes the cache back to first-boot shape, as if the service identity
    /// had changed, without requiring an actual mismatched batch to trigger it. Used by
    /// `catalog_facade`'s `reset_catalog` operation (§4.6).
    pub fn force_flush(&self) {
        let mut inner = self.inner.write().expect("catalog lock poisoned");
        info!("catalog cache force-flushed by administrative reset");
        inner.flush();
    }

    /// Applies one reconciliation batch (§4.3), returning the service id the catalog is now
    /// synced against on success.
    pub fn apply_update(&self, batch: CatalogUpdateBatch) -> Result<ServiceId, CatalogError> {
        let mut inner = self.inner.write().expect("catalog lock poisoned");

        // Step 1: service-ID check.
        if batch.service_id != inner.service_id {
            if inner.service_id.is_unknown() {
                info!(service_id = %batch.service_id, "adopting catalog service id on first boot");
                inner.service_id = batch.service_id;
            } else {
                let previous = inner.service_id;
                warn!(
                    previous = %previous,
                    incoming = %batch.service_id,
                    "catalog service id changed, flushing cache"
                );
                inner.flush();
                return Err(CatalogError::ServiceIdChanged { previous, incoming: batch.service_id });
            }
        }

        // Step 2: compute the new watermark from any CATALOG_MARKER entry in this batch.
        let mut new_version = inner.last_synced;
        for object in &batch.updated_objects {
            if let CatalogObject::Marker { version } = object {
                new_version = *version;
            }
        }

        // Step 3: apply additions in order.
        for object in &batch.updated_objects {
            apply_addition(&mut inner, object);
        }

        // Step 4: apply removals.
        for removed in &batch.removed_objects {
            apply_removal(&mut inner, removed, new_version);
        }

        // Step 5: advance the watermark.
        inner.last_synced = new_version;

        // Step 6: GC the delta log at the new watermark.
        inner.delta_log.garbage_collect(new_version);

        // Step 7: mark ready.
        if !inner.ready {
            info!("catalog cache ready after first successful update");
            inner.ready = true;
        }

        Ok(inner.service_id)
    }
}

fn apply_addition(inner: &mut CatalogInner, object: &CatalogObject) {
    match object {
        CatalogObject::Marker { .. } => {}
        CatalogObject::Database(db) => apply_database_addition(inner, db.clone()),
        CatalogObject::Table(table) => apply_table_addition(inner, table.clone()),
        CatalogObject::Function(function) => apply_function_addition(inner, function.clone()),
    }
}

fn apply_database_addition(inner: &mut CatalogInner, db: Database) {
    let key = ObjectKey::database(&db.name);
    if inner.delta_log.was_removed_after(&key, db.version) {
        debug!(database = %db.name, version = %db.version, "skipping stale database add");
        return;
    }
    let newer = inner.store.get_db(&db.name).map_or(true, |existing| existing.version < db.version);
    if newer {
        inner.store.put_db(db);
    }
}

fn apply_table_addition(inner: &mut CatalogInner, table: Table) {
    let key = ObjectKey::table(&table.db_name, &table.name);
    if inner.delta_log.was_removed_after(&key, table.version) {
        debug!(table = %key, version = %table.version, "skipping stale table add");
        return;
    }
    if inner.store.get_db(&table.db_name).is_none() {
        warn!(table = %key, "skipping table add: parent database not yet present");
        return;
    }
    let newer = inner
        .store
        .get_table(&table.db_name, &table.name)
        .map_or(true, |existing| existing.version < table.version);
    if newer {
        let db = table.db_name.clone();
        inner.store.put_table(&db, table);
    }
}

fn apply_function_addition(inner: &mut CatalogInner, function: Function) {
    let key = ObjectKey::function(&function.db_name, &function.signature);
    if inner.delta_log.was_removed_after(&key, function.version) {
        debug!(function = %key, version = %function.version, "skipping stale function add");
        return;
    }
    if inner.store.get_db(&function.db_name).is_none() {
        warn!(function = %key, "skipping function add: parent database not yet present");
        return;
    }
    let db = function.db_name.clone();
    inner.store.put_function(&db, function);
}

fn apply_removal(inner: &mut CatalogInner, removed: &crate::batch::RemovedObject, new_version: CatalogVersion) {
    let drop_version = if removed.version.is_unassigned() { new_version } else { removed.version };

    match &removed.table_or_function {
        None => {
            let key = ObjectKey::database(&removed.db);
            let stale = inner.store.get_db(&removed.db).map(|existing| existing.version);
            if stale.is_some_and(|v| v < drop_version) {
                inner.store.remove_db(&removed.db);
            }
            record_drop_if_direct(inner, key, removed.kind, removed.version, drop_version);
        }
        Some(name) if removed.kind == crate::key::ObjectKind::Function => {
            let key = ObjectKey::function(&removed.db, name);
            let stale = inner.store.get_db(&removed.db).and_then(|db| db.functions.get(&name.to_ascii_lowercase()).map(|f| f.version));
            if stale.is_some_and(|v| v < drop_version) {
                inner.store.remove_function(&removed.db, name);
            }
            record_drop_if_direct(inner, key, removed.kind, removed.version, drop_version);
        }
        Some(name) => {
            let key = ObjectKey::table(&removed.db, name);
            let stale = inner.store.get_table(&removed.db, name).map(|existing| existing.version);
            if stale.is_some_and(|v| v < drop_version) {
                inner.store.remove_table(&removed.db, name);
            }
            record_drop_if_direct(inner, key, removed.kind, removed.version, drop_version);
        }
    }
}

fn record_drop_if_direct(
    inner: &mut CatalogInner,
    key: ObjectKey,
    kind: crate::key::ObjectKind,
    supplied_version: CatalogVersion,
    drop_version: CatalogVersion,
) {
    if supplied_version > inner.last_synced {
        inner.delta_log.record_drop(key, kind, drop_version);
    }
}
