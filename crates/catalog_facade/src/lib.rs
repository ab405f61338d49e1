#![warn(missing_docs)]
//! The Request Facade: the public surface a query-executor process drives (§4.6).
//!
//! This crate wires together [`catalog_store`]'s reader/writer split and [`catalog_authz`]'s
//! checker handle into the operations a query layer actually calls: name resolution with
//! privilege enforcement, pattern-filtered listings, DDL dispatch that both drives the metastore
//! and publishes a direct update, and the opaque-bytes-in/opaque-bytes-out marshalling described
//! by the external contract.

pub mod codec;
pub mod facade;
pub mod hadoop_config;
pub mod metastore;
pub mod wire;

pub use facade::CatalogFacade;
pub use hadoop_config::HadoopConfig;
pub use metastore::{MetaStoreClient, MetaStorePool, MetastoreLease};

use std::sync::Arc;

use catalog_store::model::IncompleteTableCause;

/// The error taxonomy of the request facade (§7), covering everything a query-layer caller sees:
/// catalog lookups, authorization, and the metastore/codec seams this crate owns.
#[allow(missing_docs)]
#[derive(thiserror::Error, Debug)]
pub enum FacadeError {
    #[error("database {0:?} not found")]
    DatabaseNotFound(String),

    #[error("table {db}.{table} not found")]
    TableNotFound { db: String, table: String },

    #[error("table {db}.{table} failed to load: {cause}")]
    TableLoading { db: String, table: String, cause: Arc<IncompleteTableCause> },

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error(transparent)]
    Authorization(#[from] catalog_authz::AuthorizationError),

    #[error(transparent)]
    Catalog(#[from] catalog_store::CatalogError),

    #[error(transparent)]
    Config(#[from] catalog_config::ConfigError),

    #[error("failed to marshal request/response bytes: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("metastore operation failed: {0}")]
    Metastore(String),
}
