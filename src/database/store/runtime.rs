//! Runtime repository
//!
//! Named values in the `runtime` table. Values are updated in place; rows are
//! expected to be provisioned ahead of time.

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::database::core::RdsDb;

/// Repository for runtime values
pub struct RuntimeRepository<'a> {
    db: &'a RdsDb,
}

impl<'a> RuntimeRepository<'a> {
    pub fn new(db: &'a RdsDb) -> Self {
        Self { db }
    }

    /// Value of `name`, or an empty string
    pub fn get(&self, name: &str) -> String {
        self.db
            .query_string("", "SELECT value FROM runtime WHERE name = ?1", [name])
    }

    /// Update the value of `name`
    ///
    /// Updating a name that has no row changes nothing and is not an error.
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        let result = self.db.conn().and_then(|conn| {
            let mut stmt = conn
                .prepare("UPDATE runtime SET value = ?1 WHERE name = ?2")
                .map_err(|e| anyhow!("Failed to prepare runtime update: {}", e))?;
            stmt.execute([value, name])
                .map_err(|e| anyhow!("Failed to update runtime value '{}': {}", name, e))
        });

        match result {
            Ok(0) => {
                debug!("runtime value '{}' does not exist, nothing updated", name);
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(e) => {
                self.db.alert(&format!("query error [{}]", e));
                Err(e)
            }
        }
    }
}
