//! The wire-level shape of a single reconciliation batch (§6 `CatalogObject`).
//!
//! These types are what a broadcast from the catalog service, or a direct DDL update produced by
//! this process, actually hands to the [`crate::reconciler`]. The physical bytes that arrive over
//! the wire are out of scope (§1); `catalog_facade` is responsible for decoding them into these
//! types before calling [`crate::reconciler::CatalogWriter::apply_update`].

use serde::{Deserialize, Serialize};

use crate::key::ObjectKind;
use crate::model::{Database, Function, Table};
use crate::version::{CatalogVersion, ServiceId};

/// A single added or updated object, as carried by `updated_objects` in a batch.
///
/// `Marker` carries no payload and only ever appears to advance the last-synced watermark
/// (§4.3 step 2); real additions carry the full replacement record (§3 "Lifecycle": records are
/// replaced wholesale, never mutated in place). This is `CatalogObject` of §6 ("tagged:
/// DATABASE|TABLE|VIEW|FUNCTION|CATALOG_MARKER"), with `Table` standing in for both TABLE and
/// VIEW since the cache tracks them identically.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CatalogObject {
    Marker { version: CatalogVersion },
    Database(Database),
    Table(Table),
    Function(Function),
}

impl CatalogObject {
    /// The kind tag of this object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            CatalogObject::Marker { .. } => ObjectKind::CatalogMarker,
            CatalogObject::Database(_) => ObjectKind::Database,
            CatalogObject::Table(_) => ObjectKind::Table,
            CatalogObject::Function(_) => ObjectKind::Function,
        }
    }

    /// The version this object was produced at.
    pub fn version(&self) -> CatalogVersion {
        match self {
            CatalogObject::Marker { version } => *version,
            CatalogObject::Database(db) => db.version,
            CatalogObject::Table(table) => table.version,
            CatalogObject::Function(function) => function.version,
        }
    }
}

/// A single removed object, as carried by `removed_objects` in a batch.
///
/// `version` is `0` for heartbeat-originated drops (the Reconciler resolves these to the batch's
/// watermark, §4.3 step 4) and non-zero for direct-DDL drops, which always supply an explicit
/// version.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemovedObject {
    pub db: String,
    pub table_or_function: Option<String>,
    pub kind: ObjectKind,
    pub version: CatalogVersion,
}

impl RemovedObject {
    /// A removed database.
    pub fn database(db: &str, version: CatalogVersion) -> Self {
        RemovedObject { db: db.to_string(), table_or_function: None, kind: ObjectKind::Database, version }
    }

    /// A removed table or view.
    pub fn table(db: &str, table: &str, version: CatalogVersion) -> Self {
        RemovedObject {
            db: db.to_string(),
            table_or_function: Some(table.to_string()),
            kind: ObjectKind::Table,
            version,
        }
    }

    /// A removed function.
    pub fn function(db: &str, signature: &str, version: CatalogVersion) -> Self {
        RemovedObject {
            db: db.to_string(),
            table_or_function: Some(signature.to_string()),
            kind: ObjectKind::Function,
            version,
        }
    }
}

/// One reconciliation batch: the unit the Reconciler applies atomically under the catalog write
/// lock (§4.3, §5 "batch boundary is the serialization point").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogUpdateBatch {
    pub updated_objects: Vec<CatalogObject>,
    pub removed_objects: Vec<RemovedObject>,
    pub service_id: ServiceId,
}
