//! Fragment parsing and identifier comparison

use crate::error::{MergeError, MergeResult};
use serde_json::Value;

/// A borrowed view of a single-key fragment: `{ "<kind>": <payload> }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment<'a> {
    pub key: &'a str,
    pub data: &'a Value,
}

impl<'a> Fragment<'a> {
    /// Split a raw fragment into its key and payload
    pub fn parse(raw: &'a Value) -> MergeResult<Self> {
        let map = raw
            .as_object()
            .ok_or_else(|| MergeError::InvalidFragment(format!("expected an object, found {}", raw)))?;

        let mut entries = map.iter();
        match (entries.next(), entries.next()) {
            (Some((key, data)), None) => Ok(Fragment {
                key: key.as_str(),
                data,
            }),
            (None, _) => Err(MergeError::InvalidFragment("fragment has no key".to_string())),
            (Some(_), Some(_)) => Err(MergeError::InvalidFragment(format!(
                "fragment has {} keys, expected exactly one",
                map.len()
            ))),
        }
    }

    /// Payload identifier (`id` field), if any
    pub fn id(&self) -> Option<&'a Value> {
        payload_id(self.data)
    }
}

/// Identifier of a fragment payload
pub fn payload_id(data: &Value) -> Option<&Value> {
    data.get("id").filter(|id| !id.is_null())
}

/// Identifier of a value occupying a slot: a bare placeholder is its own
/// identifier, an already-resolved object is identified by its `id` field.
pub fn slot_id(value: &Value) -> Option<&Value> {
    match value {
        Value::Null | Value::Array(_) => None,
        Value::Object(_) => payload_id(value),
        scalar => Some(scalar),
    }
}

/// Identifier equality. Numbers compare by numeric value so `1` matches `1.0`.
pub fn same_id(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if x == y {
                return true;
            }
            match (x.as_f64(), y.as_f64()) {
                (Some(p), Some(q)) => p == q,
                _ => false,
            }
        }
        _ => a == b,
    }
}
