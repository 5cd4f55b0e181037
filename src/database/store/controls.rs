//! Controls repository
//!
//! Controls are configuration values keyed by `(host, zone, name)`. Lookups
//! always use the host of the [`RdsDb`] handle they came from.

use std::collections::BTreeMap;

use crate::database::core::RdsDb;

/// Repository for per-host control values
pub struct ControlsRepository<'a> {
    db: &'a RdsDb,
}

impl<'a> ControlsRepository<'a> {
    pub fn new(db: &'a RdsDb) -> Self {
        Self { db }
    }

    pub fn host(&self) -> &str {
        self.db.host()
    }

    /// Value of a single control, or `otherwise` when it is missing or the
    /// lookup fails
    pub fn get(&self, zone: &str, name: &str, otherwise: &str) -> String {
        self.db.query_string(
            otherwise,
            "SELECT value FROM controls WHERE host = ?1 AND zone = ?2 AND name = ?3",
            [self.host(), zone, name],
        )
    }

    /// All controls of a zone as name/value pairs
    ///
    /// Returns `None` if the lookup fails; the failure has already been
    /// alerted.
    pub fn get_zone(&self, zone: &str) -> Option<BTreeMap<String, String>> {
        self.db
            .query_pairs(
                "SELECT name, value FROM controls WHERE host = ?1 AND zone = ?2",
                [self.host(), zone],
            )
            .ok()
    }
}
