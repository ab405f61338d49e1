//! Version arithmetic for the catalog cache.
//!
//! Every object in the [`crate::object_store::ObjectStore`] carries a [`CatalogVersion`] assigned
//! by the catalog service (or, for direct DDL, by this process standing in for it). Versions are
//! strictly monotonic per object key; the cache never needs to compare versions across different
//! keys.

#[cfg(test)]
#[path = "version_test.rs"]
mod version_test;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A monotonically increasing version assigned to a single catalog mutation.
///
/// `0` is reserved and never appears on a live object in the [`crate::object_store::ObjectStore`]
/// (see invariant I1); it is used as the "nothing synced yet" watermark and as the sentinel drop
/// version that heartbeats use before it is resolved to the enclosing batch's watermark.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CatalogVersion(pub u64);

impl CatalogVersion {
    /// The reserved initial value. No live object ever carries this version.
    pub const NONE: CatalogVersion = CatalogVersion(0);

    /// True if this version has never been assigned (i.e. equals [`CatalogVersion::NONE`]).
    pub fn is_unassigned(self) -> bool {
        self == Self::NONE
    }
}

impl Display for CatalogVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CatalogVersion {
    fn from(value: u64) -> Self {
        CatalogVersion(value)
    }
}

/// The 128-bit identity of the authoritative catalog service, as a pair of 64-bit words.
///
/// [`ServiceId::UNKNOWN`] means "no service observed yet" (first boot). Once a non-sentinel id has
/// been adopted, observing a different one means the cache's authoritative source changed
/// identity (e.g. the catalog service restarted with a fresh in-memory id) and every cached
/// object must be treated as stale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId {
    pub hi: u64,
    pub lo: u64,
}

impl ServiceId {
    /// The sentinel meaning "no service observed yet".
    pub const UNKNOWN: ServiceId = ServiceId { hi: 0, lo: 0 };

    /// Constructs a non-sentinel service id from its two words.
    pub fn new(hi: u64, lo: u64) -> Self {
        ServiceId { hi, lo }
    }

    /// True for the sentinel "no service observed yet" value.
    pub fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }
}

impl Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}
