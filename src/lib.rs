#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! rdskit - convenience layer over a pooled SQLite client
//!
//! rdskit wraps `rusqlite` behind an `r2d2` pool with sensible pooling
//! defaults and adds a small set of helpers on top:
//!
//! - formatted query helpers returning scalars, columns, key/value maps, or
//!   generic row records
//! - a generic row decoder that turns any result set into ordered
//!   column-name to string records, leaving out null columns
//! - per-host "control" and process-wide "runtime" key-value lookups
//! - a backslash escaping helper for hand-built literals
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none) | Database layer, decoder, helpers, config | `rusqlite`, `r2d2` |
//! | `display` | Table rendering of records | `tabled` |
//! | `cli` | The `rdskit` binary | `clap`, `tracing-subscriber` |
//!
//! # Architecture
//!
//! - **[`database`]**: connection pool, cursor, decoder, query helpers, lookups
//! - **[`config`]**: configuration file and environment handling
//! - **[`escape`]**: string escaping
//! - **[`utils`]**: output formats
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rdskit::RdsDb;
//!
//! let db = RdsDb::connect("/var/lib/app/app.sqlite3")?;
//!
//! // Scalars fall back to a default (and alert) on any failure
//! let count = db.query_int(0, "SELECT COUNT(*) FROM jobs", []);
//!
//! // Arbitrary queries decode into ordered records; null columns are left out
//! for record in db.query_records(&format!("SELECT * FROM jobs WHERE owner = '{}'",
//!     rdskit::escape("o'brien")), [])? {
//!     println!("{}", serde_json::to_string(&record)?);
//! }
//!
//! // Per-host controls and runtime values
//! let relay = db.controls().get("mail", "relay", "localhost");
//! db.runtime().set("mode", "draining")?;
//! ```
//!
//! ## Decoding a cursor directly
//!
//! ```rust,ignore
//! use rdskit::database::{decode_all_rows, RdsDb};
//!
//! let db = RdsDb::connect_in_memory()?;
//! let records = db.query_cursor("SELECT 1 AS one, NULL AS nothing", [], |cursor| {
//!     Ok(decode_all_rows(cursor)?)
//! })?;
//! assert_eq!(records[0].get("one"), Some("1"));
//! assert!(!records[0].contains_key("nothing"));
//! ```

pub mod config;
pub mod database;
pub mod escape;
pub mod utils;

pub use config::RdsConfig;
pub use escape::escape;
pub use utils::OutputFormat;

pub use database::{
    decode_all_rows, decode_first_row, Alerter, ControlsRepository, DecodeError, MemoryAlerter,
    PoolSettings, RdsDb, RowCursor, RowRecord, RowRecords, RuntimeRepository, SchemaStatus,
    SqlValue, SqliteCursor, TracingAlerter,
};
