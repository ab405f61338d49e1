//! The metastore client seam: a name→table-record lookup with optional fallback paths (§1, out of
//! scope beyond this interface), modeled as a bounded, semaphore-guarded pool of leased clients
//! (§5 "Shared resources").

#[cfg(test)]
#[path = "metastore_test.rs"]
mod metastore_test;

use std::collections::VecDeque;
use std::ops::Deref;
use std::sync::{Arc, Mutex};

use catalog_store::model::Table;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::wire::{AlterTableParams, CreateDbParams, CreateTableLikeParams, CreateTableParams};
use crate::FacadeError;

/// A single connection to the underlying Hive-compatible metastore.
///
/// Real network I/O is out of scope (§1); this trait is the seam a test double or a future
/// implementation is driven through. Every DDL method besides `load_table` defaults to a
/// trivial success, since most test doubles only care about overriding one call; a double that
/// wants to simulate a metastore-side failure overrides the specific method it's testing.
pub trait MetaStoreClient: Send + Sync {
    /// Loads a table's full record by name, or fails (e.g. a load failure that should surface as
    /// an [`catalog_store::model::TablePayload::Incomplete`] record upstream).
    fn load_table(&self, db: &str, table: &str) -> Result<Table, FacadeError>;

    /// Creates a database in the underlying metastore.
    fn create_database(&self, _params: &CreateDbParams) -> Result<(), FacadeError> {
        Ok(())
    }

    /// Drops a database from the underlying metastore.
    fn drop_database(&self, _name: &str) -> Result<(), FacadeError> {
        Ok(())
    }

    /// Creates a table from an explicit schema in the underlying metastore.
    fn create_table(&self, _params: &CreateTableParams) -> Result<(), FacadeError> {
        Ok(())
    }

    /// Creates a table by copying another table's schema in the underlying metastore.
    fn create_table_like(&self, _params: &CreateTableLikeParams) -> Result<(), FacadeError> {
        Ok(())
    }

    /// Drops a table or view from the underlying metastore.
    fn drop_table(&self, _db: &str, _table: &str) -> Result<(), FacadeError> {
        Ok(())
    }

    /// Applies an `ALTER TABLE` sub-operation in the underlying metastore.
    fn alter_table(&self, _params: &AlterTableParams) -> Result<(), FacadeError> {
        Ok(())
    }
}

/// A bounded pool of [`MetaStoreClient`]s. Not a persistent connection pool — there is no real
/// network I/O in scope — just a `Vec`-backed semaphore gate bounding how many operations may
/// hold a client concurrently.
pub struct MetaStorePool {
    clients: Mutex<VecDeque<Box<dyn MetaStoreClient>>>,
    permits: Arc<Semaphore>,
}

impl MetaStorePool {
    /// Builds a pool from a fixed set of clients; the pool's capacity is `clients.len()`.
    pub fn new(clients: Vec<Box<dyn MetaStoreClient>>) -> Self {
        let permits = Arc::new(Semaphore::new(clients.len()));
        MetaStorePool { clients: Mutex::new(clients.into()), permits }
    }

    /// Leases a client for the duration of the returned guard. Blocks (asynchronously) until a
    /// client is free. The client is always returned to the pool when the guard drops, including
    /// on an early return or panic-unwind out of the caller (§5).
    pub async fn lease(&self) -> MetastoreLease<'_> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .expect("the pool's own semaphore is never closed");
        let client = self
            .clients
            .lock()
            .expect("metastore pool lock poisoned")
            .pop_front()
            .expect("an acquired permit guarantees a free client");
        MetastoreLease { pool: self, client: Some(client), _permit: permit }
    }
}

/// An RAII lease on one [`MetaStoreClient`] from a [`MetaStorePool`]. Dereferences to the client;
/// returns it to the pool on drop.
pub struct MetastoreLease<'a> {
    pool: &'a MetaStorePool,
    client: Option<Box<dyn MetaStoreClient>>,
    _permit: OwnedSemaphorePermit,
}

impl Deref for MetastoreLease<'_> {
    type Target = dyn MetaStoreClient;

    fn deref(&self) -> &Self::Target {
        self.client.as_deref().expect("client is only taken in Drop")
    }
}

impl Drop for MetastoreLease<'_> {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            self.pool.clients.lock().expect("metastore pool lock poisoned").push_back(client);
        }
    }
}
