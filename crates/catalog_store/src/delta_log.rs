//! The delta log: a tombstone record of dropped objects, used to stop a stale broadcast "add"
//! from resurrecting something this node (or an earlier, already-applied broadcast) already
//! dropped at a higher version.

#[cfg(test)]
#[path = "delta_log_test.rs"]
mod delta_log_test;

use std::collections::HashMap;

use crate::key::{ObjectKey, ObjectKind};
use crate::version::CatalogVersion;

#[derive(Clone, Debug)]
struct DeltaLogEntry {
    kind: ObjectKind,
    dropped_at: CatalogVersion,
}

/// A bounded, keyed record of drops. Every operation runs under the catalog write lock alongside
/// the [`crate::object_store::ObjectStore`] it protects (§4.1): there is no suspension here, and
/// no separate locking of its own.
#[derive(Debug, Default)]
pub struct DeltaLog {
    entries: HashMap<ObjectKey, DeltaLogEntry>,
}

impl DeltaLog {
    /// A fresh, empty log.
    pub fn new() -> Self {
        DeltaLog::default()
    }

    /// Records that `key` was dropped at `version`. If an entry already exists for `key`, it is
    /// replaced only when `version` is higher — later drops of the same key always win over
    /// earlier ones, never the reverse.
    pub fn record_drop(&mut self, key: ObjectKey, kind: ObjectKind, version: CatalogVersion) {
        self.entries
            .entry(key)
            .and_modify(|entry| {
                if version > entry.dropped_at {
                    entry.dropped_at = version;
                    entry.kind = kind;
                }
            })
            .or_insert(DeltaLogEntry { kind, dropped_at: version });
    }

    /// True iff `key` was dropped at a version strictly greater than `version` — i.e. whether a
    /// would-be add of `key` at `version` is stale and must be skipped.
    pub fn was_removed_after(&self, key: &ObjectKey, version: CatalogVersion) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.dropped_at > version)
    }

    /// Removes every entry whose drop version is `<= watermark`.
    ///
    /// Accepts any watermark, including one below the lowest stored version (in which case
    /// nothing is removed). This crate defines GC as total rather than reproducing the historical
    /// behavior of tolerating a thrown range error for an out-of-range watermark (§9, documented
    /// deviation in DESIGN.md) — there is no invalid input here to reject.
    pub fn garbage_collect(&mut self, watermark: CatalogVersion) {
        self.entries.retain(|_, entry| entry.dropped_at > watermark);
    }

    /// The number of entries currently retained. Exposed for tests and diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry, used when the service identity changes and the whole cache is
    /// flushed (§4.3 step 1, §9 "Service-ID sentinel semantics").
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
