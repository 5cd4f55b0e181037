//! Database schema management
//!
//! Definitions for the two application tables the lookup helpers read:
//! per-host `controls` and process-wide `runtime` values. Tables are created
//! if missing; there is no versioning or migration.

use anyhow::{anyhow, Result};
use rusqlite::Connection;

/// Schema definitions for the lookup tables
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    /// Per-host, per-zone configuration values
    pub const CONTROLS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS controls (
            host TEXT NOT NULL,
            zone TEXT NOT NULL,
            name TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (host, zone, name)
        );
    "#;

    /// Named runtime values
    pub const RUNTIME_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS runtime (
            name TEXT PRIMARY KEY,
            value TEXT NOT NULL DEFAULT ''
        );
    "#;

    pub const REQUIRED_TABLES: &'static [&'static str] = &["controls", "runtime"];
}

/// Schema manager for the lookup tables
pub struct SchemaManager<'a> {
    conn: &'a Connection,
}

impl<'a> SchemaManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create the tables if they don't exist
    pub fn initialize(&self) -> Result<()> {
        self.conn
            .execute(SchemaDefinitions::CONTROLS_TABLE, [])
            .map_err(|e| anyhow!("Failed to create controls table: {}", e))?;

        self.conn
            .execute(SchemaDefinitions::RUNTIME_TABLE, [])
            .map_err(|e| anyhow!("Failed to create runtime table: {}", e))?;

        Ok(())
    }

    /// Check which of the tables are present
    pub fn check_status(&self) -> Result<SchemaStatus> {
        let mut missing = Vec::new();
        for table in SchemaDefinitions::REQUIRED_TABLES {
            let exists: i32 = self
                .conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .map_err(|e| anyhow!("Failed to check table existence: {}", e))?;
            if exists == 0 {
                missing.push(table.to_string());
            }
        }

        Ok(if missing.is_empty() {
            SchemaStatus::Current
        } else if missing.len() == SchemaDefinitions::REQUIRED_TABLES.len() {
            SchemaStatus::NotInitialized
        } else {
            SchemaStatus::Incomplete { missing }
        })
    }

    /// Drop both tables
    pub fn reset(&self) -> Result<()> {
        self.conn.execute("DROP TABLE IF EXISTS controls", [])?;
        self.conn.execute("DROP TABLE IF EXISTS runtime", [])?;
        Ok(())
    }
}

/// Status of the lookup tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    /// Neither table exists
    NotInitialized,

    /// Both tables exist
    Current,

    /// Some tables are missing
    Incomplete { missing: Vec<String> },
}

impl std::fmt::Display for SchemaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaStatus::NotInitialized => write!(f, "not initialized"),
            SchemaStatus::Current => write!(f, "current"),
            SchemaStatus::Incomplete { missing } => {
                write!(f, "incomplete (missing: {})", missing.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_not_initialized() {
        let conn = Connection::open_in_memory().unwrap();
        let manager = SchemaManager::new(&conn);

        assert_eq!(
            manager.check_status().unwrap(),
            SchemaStatus::NotInitialized
        );
    }

    #[test]
    fn test_schema_initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        let manager = SchemaManager::new(&conn);

        manager.initialize().unwrap();
        manager.initialize().unwrap();

        assert_eq!(manager.check_status().unwrap(), SchemaStatus::Current);
    }

    #[test]
    fn test_schema_incomplete() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(SchemaDefinitions::RUNTIME_TABLE, []).unwrap();
        let manager = SchemaManager::new(&conn);

        let status = manager.check_status().unwrap();
        assert_eq!(
            status,
            SchemaStatus::Incomplete {
                missing: vec!["controls".to_string()]
            }
        );
        assert_eq!(status.to_string(), "incomplete (missing: controls)");
    }

    #[test]
    fn test_schema_reset() {
        let conn = Connection::open_in_memory().unwrap();
        let manager = SchemaManager::new(&conn);

        manager.initialize().unwrap();
        manager.reset().unwrap();
        assert_eq!(
            manager.check_status().unwrap(),
            SchemaStatus::NotInitialized
        );
    }
}
