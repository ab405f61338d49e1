//! The catalog proper: a typed mapping from database name to database record.

#[cfg(test)]
#[path = "object_store_test.rs"]
mod object_store_test;

use std::collections::BTreeMap;

use crate::model::{Database, Function, Table};
use crate::pattern;

/// The in-memory catalog. Every lookup is case-insensitive (names are stored lowercased, matching
/// [`crate::key::ObjectKey`]'s convention); every mutation is caller-enforced to respect version
/// ordering — the `ObjectStore` itself does not re-check versions, that is the
/// [`crate::reconciler`]'s job, so that this type stays a plain data structure.
#[derive(Debug, Default)]
pub struct ObjectStore {
    databases: BTreeMap<String, Database>,
}

impl ObjectStore {
    /// A fresh, empty store.
    pub fn new() -> Self {
        ObjectStore::default()
    }

    /// Looks up a database by name, case-insensitively.
    pub fn get_db(&self, name: &str) -> Option<&Database> {
        self.databases.get(&name.to_ascii_lowercase())
    }

    fn get_db_mut(&mut self, name: &str) -> Option<&mut Database> {
        self.databases.get_mut(&name.to_ascii_lowercase())
    }

    /// True iff `db` has a table or view named `table`.
    pub fn contains_table(&self, db: &str, table: &str) -> bool {
        self.get_db(db).is_some_and(|d| d.tables.contains_key(&table.to_ascii_lowercase()))
    }

    /// Looks up a table (or view) by (db, name), case-insensitively. Returns `None` if the
    /// database or the table does not exist; returns `Some` for an incomplete table too — callers
    /// must check [`Table::is_incomplete`] before trusting the payload (§7).
    pub fn get_table(&self, db: &str, table: &str) -> Option<&Table> {
        self.get_db(db)?.tables.get(&table.to_ascii_lowercase())
    }

    /// Lists database names matching `pattern` (§6), in sorted order.
    pub fn list_db_names(&self, pattern: Option<&str>) -> Vec<String> {
        self.databases.keys().filter(|name| pattern::matches(pattern, name)).cloned().collect()
    }

    /// Lists table names in `db` matching `pattern` (§6), in sorted order. Returns an empty list
    /// if the database does not exist.
    pub fn list_table_names(&self, db: &str, pattern: Option<&str>) -> Vec<String> {
        let Some(database) = self.get_db(db) else { return Vec::new() };
        database.tables.keys().filter(|name| pattern::matches(pattern, name)).cloned().collect()
    }

    /// Inserts or replaces a database record wholesale. The caller is responsible for only
    /// calling this with a record whose version is newer than any existing one (the
    /// [`crate::reconciler`] enforces this).
    pub fn put_db(&mut self, record: Database) {
        self.databases.insert(record.name.to_ascii_lowercase(), record);
    }

    /// Inserts or replaces a table record wholesale under `db`. No-op if `db` does not exist (the
    /// reconciler is responsible for skipping-and-logging in that case, §4.3 step 3).
    pub fn put_table(&mut self, db: &str, record: Table) -> bool {
        let Some(database) = self.get_db_mut(db) else { return false };
        database.tables.insert(record.name.to_ascii_lowercase(), record);
        true
    }

    /// Inserts or replaces a function record wholesale under `db`. No-op if `db` does not exist.
    pub fn put_function(&mut self, db: &str, record: Function) -> bool {
        let Some(database) = self.get_db_mut(db) else { return false };
        database.functions.insert(record.signature.to_ascii_lowercase(), record);
        true
    }

    /// Removes a database, along with its children. Idempotent.
    pub fn remove_db(&mut self, name: &str) {
        self.databases.remove(&name.to_ascii_lowercase());
    }

    /// Removes a table from `db`. Idempotent; a no-op if `db` or the table does not exist.
    pub fn remove_table(&mut self, db: &str, table: &str) {
        if let Some(database) = self.get_db_mut(db) {
            database.tables.remove(&table.to_ascii_lowercase());
        }
    }

    /// Removes a function from `db`. Idempotent.
    pub fn remove_function(&mut self, db: &str, signature: &str) {
        if let Some(database) = self.get_db_mut(db) {
            database.functions.remove(&signature.to_ascii_lowercase());
        }
    }

    /// Empties the store, used on service-id change (§4.3 step 1).
    pub fn clear(&mut self) {
        self.databases.clear();
    }
}
