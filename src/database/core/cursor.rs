//! Result cursors
//!
//! [`RowCursor`] is the narrow interface the row decoder needs from a driver:
//! column metadata, row advancement, untyped scanning, and release.
//! [`SqliteCursor`] implements it over `rusqlite::Rows`.

use rusqlite::{Params, Rows, Statement};

use super::value::SqlValue;

/// Error raised by a cursor implementation
pub type CursorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A live handle over a result set
///
/// A cursor is consumed by a single pass and is not safe for concurrent
/// iteration; all methods take `&mut self`.
pub trait RowCursor {
    /// Column names of the result set, in result order
    fn column_names(&mut self) -> Result<Vec<String>, CursorError>;

    /// Move to the next row. Returns `false` once the result set is exhausted.
    fn advance(&mut self) -> Result<bool, CursorError>;

    /// Bind the current row into `slots`, one slot per column
    fn scan(&mut self, slots: &mut [SqlValue]) -> Result<(), CursorError>;

    /// Release the underlying result set. Calling this more than once is a no-op.
    fn release(&mut self);
}

/// Cursor over a rusqlite result set
pub struct SqliteCursor<'stmt> {
    rows: Option<Rows<'stmt>>,
    current: Option<rusqlite::Result<Vec<SqlValue>>>,
}

impl<'stmt> SqliteCursor<'stmt> {
    /// Execute a prepared statement and wrap its result set
    pub fn open<P: Params>(stmt: &'stmt mut Statement<'_>, params: P) -> rusqlite::Result<Self> {
        let rows = stmt.query(params)?;
        Ok(Self {
            rows: Some(rows),
            current: None,
        })
    }

    pub fn is_released(&self) -> bool {
        self.rows.is_none()
    }
}

impl RowCursor for SqliteCursor<'_> {
    fn column_names(&mut self) -> Result<Vec<String>, CursorError> {
        let rows = self.rows.as_ref().ok_or("cursor already released")?;
        let stmt = Rows::as_ref(rows).ok_or("result set is no longer active")?;
        Ok(stmt
            .column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect())
    }

    fn advance(&mut self) -> Result<bool, CursorError> {
        let rows = self.rows.as_mut().ok_or("cursor already released")?;
        let width = Rows::as_ref(rows).map_or(0, |stmt| stmt.column_count());
        match rows.next()? {
            Some(row) => {
                let values = (0..width)
                    .map(|i| row.get_ref(i).map(SqlValue::from))
                    .collect();
                self.current = Some(values);
                Ok(true)
            }
            None => {
                self.current = None;
                Ok(false)
            }
        }
    }

    fn scan(&mut self, slots: &mut [SqlValue]) -> Result<(), CursorError> {
        let values = self.current.take().ok_or("scan called without a current row")??;
        if values.len() != slots.len() {
            return Err(format!(
                "expected {} destination slots, got {}",
                values.len(),
                slots.len()
            )
            .into());
        }
        for (slot, value) in slots.iter_mut().zip(values) {
            *slot = value;
        }
        Ok(())
    }

    fn release(&mut self) {
        self.current = None;
        self.rows = None;
    }
}

/// Scripted cursor used to inject driver faults in tests
#[cfg(test)]
pub(crate) mod scripted {
    use super::*;

    #[derive(Default)]
    pub struct ScriptedCursor {
        pub columns: Vec<String>,
        pub rows: Vec<Vec<SqlValue>>,
        pub fail_metadata: bool,
        /// Zero-based index of the row whose scan fails
        pub fail_scan_at: Option<usize>,
        pub released: bool,
        pub metadata_calls: usize,
        position: Option<usize>,
    }

    impl ScriptedCursor {
        pub fn new(columns: &[&str], rows: Vec<Vec<SqlValue>>) -> Self {
            Self {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows,
                ..Default::default()
            }
        }
    }

    impl RowCursor for ScriptedCursor {
        fn column_names(&mut self) -> Result<Vec<String>, CursorError> {
            self.metadata_calls += 1;
            if self.fail_metadata {
                return Err("metadata unavailable".into());
            }
            Ok(self.columns.clone())
        }

        fn advance(&mut self) -> Result<bool, CursorError> {
            let next = self.position.map_or(0, |p| p + 1);
            self.position = Some(next);
            Ok(next < self.rows.len())
        }

        fn scan(&mut self, slots: &mut [SqlValue]) -> Result<(), CursorError> {
            let index = self.position.ok_or("scan called without a current row")?;
            if self.fail_scan_at == Some(index) {
                return Err(format!("injected scan failure at row {}", index).into());
            }
            let row = self.rows.get(index).ok_or("scan past end of result set")?;
            for (slot, value) in slots.iter_mut().zip(row.iter()) {
                *slot = value.clone();
            }
            Ok(())
        }

        fn release(&mut self) {
            self.released = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn sample_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER, name TEXT, score REAL, raw BLOB);
             INSERT INTO t VALUES (1, 'a', 1.5, x'6869');
             INSERT INTO t VALUES (2, NULL, NULL, NULL);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_sqlite_cursor_columns_and_rows() {
        let conn = sample_conn();
        let mut stmt = conn.prepare("SELECT id, name, score, raw FROM t ORDER BY id").unwrap();
        let mut cursor = SqliteCursor::open(&mut stmt, []).unwrap();

        assert_eq!(cursor.column_names().unwrap(), vec!["id", "name", "score", "raw"]);

        let mut slots = vec![SqlValue::Null; 4];
        assert!(cursor.advance().unwrap());
        cursor.scan(&mut slots).unwrap();
        assert_eq!(
            slots,
            vec![
                SqlValue::Integer(1),
                SqlValue::Text("a".into()),
                SqlValue::Real(1.5),
                SqlValue::Blob(b"hi".to_vec()),
            ]
        );

        assert!(cursor.advance().unwrap());
        cursor.scan(&mut slots).unwrap();
        assert_eq!(slots[0], SqlValue::Integer(2));
        assert!(slots[1..].iter().all(SqlValue::is_null));

        assert!(!cursor.advance().unwrap());
    }

    #[test]
    fn test_sqlite_cursor_slot_mismatch_fails_scan() {
        let conn = sample_conn();
        let mut stmt = conn.prepare("SELECT id, name FROM t").unwrap();
        let mut cursor = SqliteCursor::open(&mut stmt, []).unwrap();

        assert!(cursor.advance().unwrap());
        let mut slots = vec![SqlValue::Null; 3];
        assert!(cursor.scan(&mut slots).is_err());
    }

    #[test]
    fn test_sqlite_cursor_release() {
        let conn = sample_conn();
        let mut stmt = conn.prepare("SELECT id FROM t").unwrap();
        let mut cursor = SqliteCursor::open(&mut stmt, []).unwrap();

        cursor.release();
        assert!(cursor.is_released());
        assert!(cursor.column_names().is_err());
        assert!(cursor.advance().is_err());
        cursor.release();
    }
}
