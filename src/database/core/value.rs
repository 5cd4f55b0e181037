//! Untyped SQL values
//!
//! Column types are only known once a query runs, so every column is read into
//! a [`SqlValue`] slot and stringified from there.

use rusqlite::types::ValueRef;
use serde::Serialize;
use std::fmt;

/// A single column value read through the driver's untyped access path
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    #[default]
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Integer view of the value
    ///
    /// Text must parse as a base-10 integer and reals must have no fractional
    /// part. Nulls and blobs that are not integer text yield `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Null => None,
            SqlValue::Integer(i) => Some(*i),
            SqlValue::Real(f) => {
                // i64::MAX as f64 rounds up to 2^63, which is already out of range
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            SqlValue::Text(s) => s.trim().parse().ok(),
            SqlValue::Blob(b) => std::str::from_utf8(b).ok()?.trim().parse().ok(),
        }
    }

    /// Canonical string form, `None` for null
    pub fn to_text(&self) -> Option<String> {
        if self.is_null() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => Ok(()),
            SqlValue::Integer(i) => write!(f, "{}", i),
            // f64's Display is the shortest representation that round-trips
            SqlValue::Real(r) => write!(f, "{}", r),
            SqlValue::Text(s) => f.write_str(s),
            SqlValue::Blob(b) => f.write_str(&String::from_utf8_lossy(b)),
        }
    }
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(r) => SqlValue::Real(r),
            ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Blob(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rules() {
        assert_eq!(SqlValue::Integer(-42).to_string(), "-42");
        assert_eq!(SqlValue::Real(0.1).to_string(), "0.1");
        assert_eq!(SqlValue::Real(2.5).to_string(), "2.5");
        assert_eq!(SqlValue::Text("héllo".into()).to_string(), "héllo");
        assert_eq!(SqlValue::Blob(b"raw bytes".to_vec()).to_string(), "raw bytes");
    }

    #[test]
    fn test_display_is_deterministic() {
        let values = [
            SqlValue::Integer(1234567890123),
            SqlValue::Real(1.0 / 3.0),
            SqlValue::Text("abc".into()),
            SqlValue::Blob(vec![0x61, 0x62]),
        ];
        for v in &values {
            assert_eq!(v.to_string(), v.clone().to_string());
        }
    }

    #[test]
    fn test_null_has_no_text() {
        assert_eq!(SqlValue::Null.to_text(), None);
        assert_eq!(SqlValue::Integer(0).to_text(), Some("0".to_string()));
        assert_eq!(SqlValue::Text(String::new()).to_text(), Some(String::new()));
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(SqlValue::Integer(7).as_i64(), Some(7));
        assert_eq!(SqlValue::Text(" 12 ".into()).as_i64(), Some(12));
        assert_eq!(SqlValue::Text("twelve".into()).as_i64(), None);
        assert_eq!(SqlValue::Real(3.0).as_i64(), Some(3));
        assert_eq!(SqlValue::Real(3.5).as_i64(), None);
        assert_eq!(SqlValue::Real(9223372036854775808.0).as_i64(), None);
        assert_eq!(SqlValue::Real(-9223372036854775808.0).as_i64(), Some(i64::MIN));
        assert_eq!(SqlValue::Real(1e30).as_i64(), None);
        assert_eq!(SqlValue::Blob(b"99".to_vec()).as_i64(), Some(99));
        assert_eq!(SqlValue::Null.as_i64(), None);
    }

    #[test]
    fn test_from_value_ref() {
        assert_eq!(SqlValue::from(ValueRef::Null), SqlValue::Null);
        assert_eq!(SqlValue::from(ValueRef::Integer(5)), SqlValue::Integer(5));
        assert_eq!(
            SqlValue::from(ValueRef::Text(b"x")),
            SqlValue::Text("x".to_string())
        );
        assert_eq!(
            SqlValue::from(ValueRef::Blob(&[1, 2])),
            SqlValue::Blob(vec![1, 2])
        );
    }
}
