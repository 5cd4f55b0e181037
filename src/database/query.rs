//! Formatted query helpers
//!
//! SQL is passed in already formatted (callers use `format!`), optionally
//! with bound parameters; pass `[]` when there are none. The scalar helpers
//! never fail: they alert and return the caller's fallback instead. The
//! collection helpers alert and return the error.

use anyhow::{anyhow, Result};
use rusqlite::Params;
use std::collections::BTreeMap;

use super::core::{
    decode_all_rows, decode_first_row, RdsDb, RowCursor, RowRecord, RowRecords, SqlValue,
    SqliteCursor, RECORDS_INIT,
};

impl RdsDb {
    /// Run `f` over a live cursor for `sql`
    ///
    /// The cursor is released once `f` returns, whether it succeeded or not.
    pub fn query_cursor<P, T, F>(&self, sql: &str, params: P, f: F) -> Result<T>
    where
        P: Params,
        F: FnOnce(&mut SqliteCursor<'_>) -> Result<T>,
    {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| anyhow!("Failed to prepare query: {}", e))?;
        let mut cursor = SqliteCursor::open(&mut stmt, params)
            .map_err(|e| anyhow!("Failed to execute query: {}", e))?;
        with_released(&mut cursor, f)
    }

    /// First column of the first row as text, or `otherwise`
    pub fn query_string<P: Params>(&self, otherwise: &str, sql: &str, params: P) -> String {
        match self.first_value(sql, params) {
            Ok(Some(value)) => match value.to_text() {
                Some(text) => text,
                None => {
                    self.alert(&format!("scan failed [null value] ({})", sql));
                    otherwise.to_string()
                }
            },
            Ok(None) => otherwise.to_string(),
            Err(e) => {
                self.alert(&format!("failed [{}] ({})", e, sql));
                otherwise.to_string()
            }
        }
    }

    /// First column of the first row as an integer, or `otherwise`
    ///
    /// Integer text and reals without a fractional part are accepted.
    pub fn query_int<P: Params>(&self, otherwise: i64, sql: &str, params: P) -> i64 {
        match self.first_value(sql, params) {
            Ok(Some(value)) => match value.as_i64() {
                Some(i) => i,
                None => {
                    self.alert(&format!(
                        "scan failed [cannot convert {:?} to integer] ({})",
                        value, sql
                    ));
                    otherwise
                }
            },
            Ok(None) => otherwise,
            Err(e) => {
                self.alert(&format!("failed [{}] ({})", e, sql));
                otherwise
            }
        }
    }

    /// First column of every row
    pub fn query_column<P: Params>(&self, sql: &str, params: P) -> Result<Vec<String>> {
        let result = self.scan_rows(sql, params, 1, None).and_then(|rows| {
            rows.into_iter()
                .map(|row| row_text(&row, 0))
                .collect::<Result<Vec<_>>>()
        });
        self.alert_on_err("query_column", sql, result)
    }

    /// First two columns of every row as key/value pairs
    ///
    /// A key seen twice keeps the value of its last row.
    pub fn query_pairs<P: Params>(&self, sql: &str, params: P) -> Result<BTreeMap<String, String>> {
        let result = self.scan_rows(sql, params, 2, None).and_then(|rows| {
            let mut pairs = BTreeMap::new();
            for row in rows {
                pairs.insert(row_text(&row, 0)?, row_text(&row, 1)?);
            }
            Ok(pairs)
        });
        self.alert_on_err("query_pairs", sql, result)
    }

    /// First row as a record, `None` if the query returned no rows
    pub fn query_record<P: Params>(&self, sql: &str, params: P) -> Result<Option<RowRecord>> {
        let result = self.query_cursor(sql, params, |cursor| Ok(decode_first_row(cursor)?));
        self.alert_on_err("query_record", sql, result)
    }

    /// Every row as a record
    pub fn query_records<P: Params>(&self, sql: &str, params: P) -> Result<RowRecords> {
        let result = self.query_cursor(sql, params, |cursor| Ok(decode_all_rows(cursor)?));
        self.alert_on_err("query_records", sql, result)
    }

    /// Execute a statement, returning the number of rows changed
    pub fn exec<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        let result = self.conn().and_then(|conn| {
            conn.execute(sql, params)
                .map_err(|e| anyhow!("Failed to execute SQL: {}", e))
        });
        self.alert_on_err("exec", sql, result)
    }

    fn first_value<P: Params>(&self, sql: &str, params: P) -> Result<Option<SqlValue>> {
        let rows = self.scan_rows(sql, params, 1, Some(1))?;
        Ok(rows.into_iter().next().and_then(|row| row.into_iter().next()))
    }

    /// Scan up to `limit` rows of exactly `width` columns
    fn scan_rows<P: Params>(
        &self,
        sql: &str,
        params: P,
        width: usize,
        limit: Option<usize>,
    ) -> Result<Vec<Vec<SqlValue>>> {
        self.query_cursor(sql, params, |cursor| {
            let mut rows = Vec::with_capacity(limit.unwrap_or(RECORDS_INIT));
            while limit.map_or(true, |max| rows.len() < max) {
                if !cursor
                    .advance()
                    .map_err(|e| anyhow!("Failed to read row: {}", e))?
                {
                    break;
                }
                let mut slots = vec![SqlValue::Null; width];
                cursor
                    .scan(&mut slots)
                    .map_err(|e| anyhow!("scan failed [{}]", e))?;
                rows.push(slots);
            }
            Ok(rows)
        })
    }

    fn alert_on_err<T>(&self, op: &str, sql: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.alert(&format!("{} failed [{}] ({})", op, e, sql));
        }
        result
    }
}

fn row_text(row: &[SqlValue], index: usize) -> Result<String> {
    row.get(index)
        .and_then(SqlValue::to_text)
        .ok_or_else(|| anyhow!("scan failed [null value in column {}]", index))
}

/// Run `f` over `cursor` and release the cursor afterwards on every path
fn with_released<C, T, F>(cursor: &mut C, f: F) -> Result<T>
where
    C: RowCursor,
    F: FnOnce(&mut C) -> Result<T>,
{
    let result = f(cursor);
    cursor.release();
    result
}
