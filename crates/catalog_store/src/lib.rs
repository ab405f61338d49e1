#![warn(missing_docs)]
//! The in-memory catalog cache: data model, delta log, object store, and update reconciler.
//!
//! A consumer opens a catalog with [`open_catalog`], gets back a [`CatalogReader`] to hand to
//! every lookup path and a [`CatalogWriter`] to drive with reconciliation batches, and builds
//! those batches out of the types in [`batch`] and [`model`].

pub mod batch;
pub mod delta_log;
pub mod key;
pub mod model;
pub mod object_store;
pub mod pattern;
mod reconciler;
pub mod version;

pub use reconciler::{open_catalog, CatalogReader, CatalogWriter};

use serde::{Deserialize, Serialize};

use crate::version::ServiceId;

/// The error taxonomy of the catalog cache (§7 of the originating design).
///
/// Per-object reconciliation errors never surface here: they are logged and swallowed inside
/// [`CatalogWriter::apply_update`] so that a single malformed object cannot abort a batch.
#[allow(missing_docs)]
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error(
        "catalog service id changed from {previous} to {incoming}; cache flushed, caller must \
         request a full resync"
    )]
    ServiceIdChanged { previous: ServiceId, incoming: ServiceId },

    #[error("database {0:?} not found")]
    DatabaseNotFound(String),

    #[error("table {db}.{table} not found")]
    TableNotFound { db: String, table: String },

    #[error("table {db}.{table} failed to load: {cause}")]
    TableLoading { db: String, table: String, cause: std::sync::Arc<model::IncompleteTableCause> },

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error(transparent)]
    Internal(#[from] serde_json::Error),
}

/// Configuration for the catalog store. Beyond a readiness-probe toggle there is no substantial
/// tuning surface here; the struct exists for uniformity with `catalog_authz::AuthorizationConfig`
/// and so a future tuning knob has somewhere to land.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CatalogConfig {
    /// Whether readiness probes should consult [`CatalogReader::is_ready`] at all, or always
    /// report ready (useful for tests that never apply a first batch).
    pub require_ready: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig { require_ready: true }
    }
}

impl catalog_config::dumping::SerializeConfig for CatalogConfig {
    fn dump(&self) -> std::collections::BTreeMap<catalog_config::ParamPath, catalog_config::SerializedParam> {
        std::collections::BTreeMap::from([catalog_config::dumping::ser_param(
            "require_ready",
            &self.require_ready,
            "Whether the readiness probe requires a first successful reconciliation batch.",
        )])
    }
}
