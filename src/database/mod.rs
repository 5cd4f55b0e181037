//! Database module
//!
//! ```text
//! database/
//! ├── core/           # Foundation
//! │   ├── connection  # Pooled RdsDb handle and pool settings
//! │   ├── cursor      # RowCursor trait, SQLite cursor adapter
//! │   ├── decoder     # Generic row decoding into RowRecords
//! │   ├── record      # RowRecord (ordered, nulls omitted)
//! │   ├── value       # SqlValue and its string form
//! │   ├── alert       # Failure alerting hook
//! │   └── schema      # controls / runtime tables
//! │
//! ├── query           # Formatted query helpers on RdsDb
//! └── store/          # Key-value lookups
//!     ├── controls    # Per-host control values
//!     └── runtime     # Runtime values
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use rdskit::database::RdsDb;
//!
//! let db = RdsDb::connect("/var/lib/app/app.sqlite3")?;
//!
//! let name = db.query_string("unknown", &format!("SELECT name FROM users WHERE id = {}", 7), []);
//! let rows = db.query_records("SELECT * FROM users WHERE active = ?1", [1])?;
//! for row in &rows {
//!     println!("{:?}", row.get("email"));
//! }
//!
//! let relay = db.controls().get("mail", "relay", "localhost");
//! db.runtime().set("mode", "draining")?;
//! ```

pub mod core;
pub mod query;
pub mod store;

pub use core::{
    decode_all_rows, decode_first_row, local_hostname, Alerter, CursorError, DecodeError,
    MemoryAlerter, PoolSettings, PoolStatus, PooledConn, RdsDb, RowCursor, RowRecord, RowRecords,
    SchemaDefinitions, SchemaManager, SchemaStatus, SqlValue, SqliteCursor, TracingAlerter,
    RECORDS_INIT,
};
pub use store::{ControlsRepository, RuntimeRepository};

/// Ensure the parent directory of a database file exists
pub fn ensure_parent_dir(db_path: &str) -> anyhow::Result<()> {
    match std::path::Path::new(db_path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create database directory '{}': {}",
                    parent.display(),
                    e
                )
            }),
        _ => Ok(()),
    }
}
