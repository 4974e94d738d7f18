use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Status;

/// Field holding the unique record identifier.
pub const ID_FIELD: &str = "ID";
/// Field holding the request lifecycle status.
pub const STATUS_FIELD: &str = "Status";

/// One procurement request as delivered by the read endpoint.
///
/// Records are schema-free: an ordered mapping from field name to a scalar
/// JSON value. The set of fields present determines which columns a view
/// renders, so insertion order is preserved end to end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self { fields: fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// Unique identifier, or `None` when the ID field is absent or blank.
    pub fn id(&self) -> Option<&str> {
        match self.fields.get(ID_FIELD) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }

    /// Parsed status, or `None` when absent or not in the enumeration.
    pub fn status(&self) -> Option<Status> {
        self.text(STATUS_FIELD).parse().ok()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Display text of a field. Missing fields and JSON nulls are empty.
    pub fn text(&self, field: &str) -> Cow<'_, str> {
        match self.fields.get(field) {
            Some(Value::String(s)) => Cow::Borrowed(s),
            Some(Value::Null) | None => Cow::Borrowed(""),
            Some(other) => Cow::Owned(scalar_text(other)),
        }
    }

    /// Numeric value of a field, accepting both JSON numbers and numeric
    /// strings (the spreadsheet backend is not consistent about which it
    /// returns).
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.fields.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Non-negative integer value of a field (quantities).
    pub fn quantity(&self, field: &str) -> Option<u64> {
        let n = self.number(field)?;
        if n.is_finite() && n >= 0.0 && n.fract() == 0.0 { Some(n as u64) } else { None }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
