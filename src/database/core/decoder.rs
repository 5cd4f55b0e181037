//! Generic row decoder
//!
//! Turns a result set whose columns are only known at runtime into
//! [`RowRecord`]s: one record per row, column order preserved, null columns
//! omitted.
//!
//! Column names are read once, before iteration. Each row is scanned into one
//! untyped [`SqlValue`] slot per column and every non-null slot is stringified.
//! Any failure aborts the pass; records decoded before the failing row are
//! discarded along with it. The decoder advances the cursor but never releases
//! it, that is left to whoever opened it.

use thiserror::Error;
use tracing::debug;

use super::cursor::{CursorError, RowCursor};
use super::record::{RowRecord, RowRecords};
use super::value::SqlValue;

/// Capacity hint for the all-rows output
pub const RECORDS_INIT: usize = 32;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The result set's column list could not be read
    #[error("failed to read result columns: {0}")]
    Metadata(#[source] CursorError),

    /// Advancing to, or scanning, a row failed. `row` is zero-based.
    #[error("failed to scan row {row}: {source}")]
    Scan {
        row: usize,
        #[source]
        source: CursorError,
    },
}

/// Decode the first row of the result set
///
/// Returns `Ok(None)` when the result set is empty.
pub fn decode_first_row<C>(cursor: &mut C) -> Result<Option<RowRecord>, DecodeError>
where
    C: RowCursor + ?Sized,
{
    let mut decoder = RowDecoder::prepare(cursor)?;
    decoder.next_record(cursor)
}

/// Decode every row of the result set, in cursor order
pub fn decode_all_rows<C>(cursor: &mut C) -> Result<RowRecords, DecodeError>
where
    C: RowCursor + ?Sized,
{
    let mut decoder = RowDecoder::prepare(cursor)?;
    let mut records = RowRecords::with_capacity(RECORDS_INIT);
    while let Some(record) = decoder.next_record(cursor)? {
        records.push(record);
    }
    debug!(
        "decoded {} rows over {} columns",
        records.len(),
        decoder.columns.len()
    );
    Ok(records)
}

struct RowDecoder {
    columns: Vec<String>,
    slots: Vec<SqlValue>,
    row: usize,
}

impl RowDecoder {
    fn prepare<C: RowCursor + ?Sized>(cursor: &mut C) -> Result<Self, DecodeError> {
        let columns = cursor.column_names().map_err(DecodeError::Metadata)?;
        let slots = vec![SqlValue::Null; columns.len()];
        Ok(Self {
            columns,
            slots,
            row: 0,
        })
    }

    fn next_record<C: RowCursor + ?Sized>(
        &mut self,
        cursor: &mut C,
    ) -> Result<Option<RowRecord>, DecodeError> {
        let row = self.row;
        if !cursor
            .advance()
            .map_err(|source| DecodeError::Scan { row, source })?
        {
            return Ok(None);
        }

        cursor
            .scan(&mut self.slots)
            .map_err(|source| DecodeError::Scan { row, source })?;

        let mut record = RowRecord::with_capacity(self.columns.len());
        for (name, slot) in self.columns.iter().zip(self.slots.iter_mut()) {
            // take() leaves Null behind so nothing carries over to the next row
            if let Some(text) = std::mem::take(slot).to_text() {
                record.insert(name.as_str(), text);
            }
        }

        self.row += 1;
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::core::cursor::scripted::ScriptedCursor;
    use crate::database::core::cursor::SqliteCursor;
    use rusqlite::Connection;

    fn three_column_table() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE items (id INTEGER, name TEXT, note TEXT);
             INSERT INTO items VALUES (1, 'a', NULL);
             INSERT INTO items VALUES (2, 'b', 'x');",
        )
        .unwrap();
        conn
    }

    fn scripted_rows() -> ScriptedCursor {
        ScriptedCursor::new(
            &["id", "name", "note"],
            vec![
                vec![1i64.into(), "a".into(), SqlValue::Null],
                vec![2i64.into(), "b".into(), "x".into()],
            ],
        )
    }

    #[test]
    fn test_decode_all_rows_omits_nulls() {
        let conn = three_column_table();
        let mut stmt = conn
            .prepare("SELECT id, name, note FROM items ORDER BY id")
            .unwrap();
        let mut cursor = SqliteCursor::open(&mut stmt, []).unwrap();

        let records = decode_all_rows(&mut cursor).unwrap();

        let expected: RowRecords = vec![
            [("id", "1"), ("name", "a")].into_iter().collect(),
            [("id", "2"), ("name", "b"), ("note", "x")].into_iter().collect(),
        ];
        assert_eq!(records, expected);
        assert!(!records[0].contains_key("note"));
    }

    #[test]
    fn test_column_order_is_insertion_order() {
        let conn = three_column_table();
        let mut stmt = conn
            .prepare("SELECT note, id, name FROM items WHERE id = 2")
            .unwrap();
        let mut cursor = SqliteCursor::open(&mut stmt, []).unwrap();

        let record = decode_first_row(&mut cursor).unwrap().unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["note", "id", "name"]);
    }

    #[test]
    fn test_empty_result_set() {
        let conn = three_column_table();

        let mut stmt = conn.prepare("SELECT * FROM items WHERE id > 100").unwrap();
        let mut cursor = SqliteCursor::open(&mut stmt, []).unwrap();
        assert_eq!(decode_first_row(&mut cursor).unwrap(), None);

        let mut stmt = conn.prepare("SELECT * FROM items WHERE id > 100").unwrap();
        let mut cursor = SqliteCursor::open(&mut stmt, []).unwrap();
        assert!(decode_all_rows(&mut cursor).unwrap().is_empty());
    }

    #[test]
    fn test_decode_first_row_stops_after_one() {
        let mut cursor = scripted_rows();
        let record = decode_first_row(&mut cursor).unwrap().unwrap();
        assert_eq!(record.get("id"), Some("1"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_primitive_kinds_stringify_deterministically() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE kinds (i INTEGER, t TEXT, r REAL, b BLOB);
             INSERT INTO kinds VALUES (-17, 'text', 0.25, x'626c6f62');",
        )
        .unwrap();

        let decode = || {
            let mut stmt = conn.prepare("SELECT i, t, r, b FROM kinds").unwrap();
            let mut cursor = SqliteCursor::open(&mut stmt, []).unwrap();
            decode_first_row(&mut cursor).unwrap().unwrap()
        };

        let first = decode();
        assert_eq!(first.get("i"), Some("-17"));
        assert_eq!(first.get("t"), Some("text"));
        assert_eq!(first.get("r"), Some("0.25"));
        assert_eq!(first.get("b"), Some("blob"));
        assert_eq!(first, decode());
    }

    #[test]
    fn test_scan_failure_discards_earlier_rows() {
        let mut cursor = scripted_rows();
        cursor.fail_scan_at = Some(1);

        let err = decode_all_rows(&mut cursor).unwrap_err();
        match err {
            DecodeError::Scan { row, .. } => assert_eq!(row, 1),
            other => panic!("unexpected error: {other}"),
        }
        // The decoder leaves release to the caller
        assert!(!cursor.released);
    }

    #[test]
    fn test_scan_failure_on_first_row() {
        let mut cursor = scripted_rows();
        cursor.fail_scan_at = Some(0);
        assert!(matches!(
            decode_first_row(&mut cursor),
            Err(DecodeError::Scan { row: 0, .. })
        ));
    }

    #[test]
    fn test_metadata_failure_decodes_nothing() {
        let mut cursor = scripted_rows();
        cursor.fail_metadata = true;

        let err = decode_all_rows(&mut cursor).unwrap_err();
        assert!(matches!(err, DecodeError::Metadata(_)));
        assert!(err.to_string().contains("metadata unavailable"));
    }

    #[test]
    fn test_columns_fetched_once() {
        let mut cursor = scripted_rows();
        decode_all_rows(&mut cursor).unwrap();
        assert_eq!(cursor.metadata_calls, 1);
    }

    #[test]
    fn test_null_does_not_leak_between_rows() {
        let mut cursor = ScriptedCursor::new(
            &["a", "b"],
            vec![
                vec!["1".into(), "2".into()],
                vec![SqlValue::Null, "3".into()],
            ],
        );
        let records = decode_all_rows(&mut cursor).unwrap();
        assert_eq!(records[1].get("a"), None);
        assert_eq!(records[1].get("b"), Some("3"));
    }
}
