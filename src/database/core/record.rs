//! Decoded row records

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One decoded row: column name to stringified value
///
/// Keys keep the column order of the result set. Columns that were null are
/// not present at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowRecord {
    fields: Vec<(String, String)>,
}

/// All decoded rows of a query, in cursor order
pub type RowRecords = Vec<RowRecord>;

impl RowRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Insert a value, replacing (in place) any earlier value under the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl IntoIterator for RowRecord {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RowRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RowRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for RowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut record = RowRecord::new();
        record.insert("zeta", "1");
        record.insert("alpha", "2");
        record.insert("mid", "3");

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(record.values().collect::<Vec<_>>(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_duplicate_key_replaces_in_place() {
        let mut record = RowRecord::new();
        record.insert("a", "1");
        record.insert("b", "2");
        record.insert("a", "3");

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some("3"));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_lookup() {
        let record: RowRecord = [("id", "1"), ("name", "a")].into_iter().collect();
        assert!(record.contains_key("id"));
        assert!(!record.contains_key("note"));
        assert_eq!(record.get("name"), Some("a"));
        assert_eq!(record.get("note"), None);
    }

    #[test]
    fn test_serialize_keeps_order() {
        let record: RowRecord = [("id", "2"), ("name", "b"), ("note", "x")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":"2","name":"b","note":"x"}"#);
    }
}
