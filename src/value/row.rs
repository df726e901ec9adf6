//! Result rows

use serde_json::{Map, Value};

use super::value::ExprValue;

/// Ordered mapping from output name to typed value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRow {
    columns: Vec<(String, ExprValue)>,
}

impl ResultRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column. Names are expected to be unique; a repeated name
    /// replaces the earlier value in place.
    pub fn push(&mut self, name: impl Into<String>, value: ExprValue) {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.columns.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: ExprValue) -> Self {
        self.push(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ExprValue> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Column names in output order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExprValue)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.columns {
            map.insert(name.clone(), value.to_json());
        }
        Value::Object(map)
    }
}
