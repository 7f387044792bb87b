//! Row field sets passed to insert operations.

use rusqlite::types::Value;

use crate::contract::COLUMN_URI;

/// An insertion-ordered set of column/value pairs.
///
/// Putting a value for a column that is already present overwrites it in
/// place, keeping the original position.
#[derive(Debug, Clone, Default)]
pub struct RowValues {
    fields: Vec<(String, Value)>,
}

impl RowValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, column: &str, value: Value) -> &mut Self {
        match self.fields.iter_mut().find(|(name, _)| name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column.to_string(), value)),
        }
        self
    }

    pub fn put_text(&mut self, column: &str, value: &str) -> &mut Self {
        self.put(column, Value::Text(value.to_string()))
    }

    pub fn put_integer(&mut self, column: &str, value: i64) -> &mut Self {
        self.put(column, Value::Integer(value))
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// The `uri` field as non-empty text, if present and well formed.
    pub fn uri_text(&self) -> Option<&str> {
        match self.get(COLUMN_URI) {
            Some(Value::Text(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Convenience constructor for the common single-field case.
    pub fn with_uri(uri: &str) -> Self {
        let mut values = Self::new();
        values.put_text(COLUMN_URI, uri);
        values
    }
}
