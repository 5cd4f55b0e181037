//! Core database infrastructure
//!
//! - `RdsDb`: pooled SQLite handle with pooling defaults and an alerting hook
//! - `RowCursor` / `SqliteCursor`: result cursors consumed by the decoder
//! - `decode_first_row` / `decode_all_rows`: generic row decoding into `RowRecord`s
//! - `SchemaManager`: creation of the controls and runtime tables

mod alert;
mod connection;
mod cursor;
mod decoder;
mod record;
mod schema;
mod value;

pub use alert::{Alerter, MemoryAlerter, TracingAlerter};
pub use connection::{local_hostname, PoolSettings, PoolStatus, PooledConn, RdsDb};
pub use cursor::{CursorError, RowCursor, SqliteCursor};
pub use decoder::{decode_all_rows, decode_first_row, DecodeError, RECORDS_INIT};
pub use record::{RowRecord, RowRecords};
pub use schema::{SchemaDefinitions, SchemaManager, SchemaStatus};
pub use value::SqlValue;

#[cfg(test)]
pub(crate) use cursor::scripted;
