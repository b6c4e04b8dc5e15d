//! Field paths into a JSON entity tree
//!
//! Syntax is dot-separated field names. A purely numeric segment, or a
//! `[n]` suffix on a segment, addresses an array element:
//! `details.tracks`, `details.tracks.0`, `details.tracks[0].userDetails`.

use crate::error::SchemaError;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// One step of a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Parsed field path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Path addressing the value itself
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dotted path. Empty paths and empty segments are rejected.
    pub fn parse(raw: &str) -> Result<Self, SchemaError> {
        if raw.trim().is_empty() {
            return Err(SchemaError::invalid_path(raw, "path is empty"));
        }

        let mut segments = Vec::new();
        for part in raw.split('.') {
            parse_part(raw, part, &mut segments)?;
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// New path with `other` appended
    pub fn join(&self, other: &FieldPath) -> FieldPath {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        FieldPath { segments }
    }

    /// New path with an array index appended
    pub fn index(&self, index: usize) -> FieldPath {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        FieldPath { segments }
    }

    /// Structural lookup. Any absent segment yields `None`.
    pub fn get<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        let mut current = value;
        for segment in &self.segments {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key)?,
                (PathSegment::Index(idx), Value::Array(arr)) => arr.get(*idx)?,
                // Numeric segment on an object is a plain field name
                (PathSegment::Index(idx), Value::Object(map)) => map.get(&idx.to_string())?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Mutable structural lookup. Never creates intermediate structure.
    pub fn get_mut<'a>(&self, value: &'a mut Value) -> Option<&'a mut Value> {
        let mut current = value;
        for segment in &self.segments {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get_mut(key)?,
                (PathSegment::Index(idx), Value::Array(arr)) => arr.get_mut(*idx)?,
                (PathSegment::Index(idx), Value::Object(map)) => map.get_mut(&idx.to_string())?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Replace the value at this path. Returns `false` when the path does not
    /// already exist.
    pub fn set(&self, value: &mut Value, new_value: Value) -> bool {
        match self.get_mut(value) {
            Some(slot) => {
                *slot = new_value;
                true
            }
            None => false,
        }
    }
}

fn parse_part(raw: &str, part: &str, segments: &mut Vec<PathSegment>) -> Result<(), SchemaError> {
    if part.is_empty() {
        return Err(SchemaError::invalid_path(raw, "empty segment"));
    }

    if part.bytes().all(|b| b.is_ascii_digit()) {
        let idx = part
            .parse()
            .map_err(|_| SchemaError::invalid_path(raw, format!("index out of range: {}", part)))?;
        segments.push(PathSegment::Index(idx));
        return Ok(());
    }

    let (name, mut rest) = match part.find('[') {
        Some(pos) => part.split_at(pos),
        None => (part, ""),
    };

    if name.contains(']') {
        return Err(SchemaError::invalid_path(raw, format!("unbalanced bracket in \"{}\"", part)));
    }
    if !name.is_empty() {
        segments.push(PathSegment::Key(name.to_string()));
    }

    while !rest.is_empty() {
        let close = rest
            .find(']')
            .filter(|_| rest.starts_with('['))
            .ok_or_else(|| SchemaError::invalid_path(raw, format!("unbalanced bracket in \"{}\"", part)))?;
        let digits = &rest[1..close];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SchemaError::invalid_path(raw, format!("invalid index \"{}\"", digits)));
        }
        let idx = digits
            .parse()
            .map_err(|_| SchemaError::invalid_path(raw, format!("index out of range: {}", digits)))?;
        segments.push(PathSegment::Index(idx));
        rest = &rest[close + 1..];
    }

    Ok(())
}

impl FromStr for FieldPath {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(k: &str) -> PathSegment {
        PathSegment::Key(k.to_string())
    }

    #[test]
    fn test_parse_dotted_and_bracket_forms() {
        let dotted = FieldPath::parse("details.tracks.0.userDetails").unwrap();
        let bracket = FieldPath::parse("details.tracks[0].userDetails").unwrap();
        assert_eq!(dotted, bracket);
        assert_eq!(
            dotted.segments(),
            &[key("details"), key("tracks"), PathSegment::Index(0), key("userDetails")]
        );
        assert_eq!(dotted.to_string(), "details.tracks[0].userDetails");
    }

    #[test]
    fn test_parse_rejects_malformed_paths() {
        for raw in ["", "  ", "details..tracks", ".details", "tracks[", "tracks[x]", "tracks]0[", "a[]"] {
            assert!(FieldPath::parse(raw).is_err(), "expected '{}' to be rejected", raw);
        }
    }

    #[test]
    fn test_get_missing_segments() {
        let doc = json!({"details": {"tracks": [100, 101]}});
        let path = FieldPath::parse("details.tracks").unwrap();
        assert_eq!(path.get(&doc), Some(&json!([100, 101])));
        assert_eq!(FieldPath::parse("details.tracks.1").unwrap().get(&doc), Some(&json!(101)));
        assert_eq!(FieldPath::parse("details.tracks.5").unwrap().get(&doc), None);
        assert_eq!(FieldPath::parse("details.artists").unwrap().get(&doc), None);
        assert_eq!(FieldPath::parse("details.tracks.name").unwrap().get(&doc), None);
    }

    #[test]
    fn test_set_only_existing_paths() {
        let mut doc = json!({"details": {"id": 1}});
        assert!(FieldPath::parse("details.id").unwrap().set(&mut doc, json!({"id": 1, "x": true})));
        assert!(!FieldPath::parse("details.tracks.0").unwrap().set(&mut doc, json!(5)));
        assert_eq!(doc, json!({"details": {"id": {"id": 1, "x": true}}}));
    }

    #[test]
    fn test_numeric_segment_on_object_is_field() {
        let doc = json!({"discs": {"1": [7]}});
        assert_eq!(FieldPath::parse("discs.1.0").unwrap().get(&doc), Some(&json!(7)));
    }
}
