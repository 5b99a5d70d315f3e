//! Records: one row or event, keyed by column name.

use crate::value::Value;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::hash_map;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("record must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("invalid JSON record: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single record as a column-name to value mapping.
///
/// Columns that are not present are "absent"; there is no NULL value.
/// Deserializing goes through [`TryFrom<serde_json::Value>`], so non-scalar
/// fields are skipped exactly as in [`Record::from_json_str`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    columns: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, returning the previous value if there was one
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.columns.insert(column.into(), value.into())
    }

    /// Builder-style [`Record::insert`]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.columns.iter()
    }

    /// Parse a record from a JSON object.
    ///
    /// `null`, array and object fields cannot be represented as scalars and
    /// are left out, so they behave as absent columns.
    pub fn from_json_str(input: &str) -> Result<Self, RecordError> {
        let json: serde_json::Value = serde_json::from_str(input)?;
        Self::try_from(json)
    }
}

impl TryFrom<serde_json::Value> for Record {
    type Error = RecordError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        let object = match json {
            serde_json::Value::Object(object) => object,
            other => return Err(RecordError::NotAnObject(json_kind(&other))),
        };

        let mut record = Record::new();
        for (column, field) in object {
            let value = match field {
                serde_json::Value::Bool(b) => Value::Boolean(b),
                serde_json::Value::String(s) => Value::Text(s),
                serde_json::Value::Number(n) => match n.as_i64() {
                    Some(i) => Value::Integer(i),
                    None => match n.as_f64() {
                        Some(f) => Value::Float(f),
                        None => {
                            debug!("skipping column {}: number {} out of range", column, n);
                            continue;
                        }
                    },
                },
                other => {
                    debug!(
                        "skipping column {}: {} is not a scalar",
                        column,
                        json_kind(&other)
                    );
                    continue;
                }
            };
            record.columns.insert(column, value);
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Record::try_from(json).map_err(serde::de::Error::custom)
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
