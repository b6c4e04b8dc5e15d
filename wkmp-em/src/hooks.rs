//! Caller-supplied collaborators of the merger
//!
//! - [`Diagnostics`]: receives non-fatal skip warnings
//! - [`ValueAdopter`]: hands each written value through a host-specific
//!   "adopt into target context" step before it is stored

use serde_json::Value;
use std::sync::Mutex;
use tracing::warn;

/// Sink for non-fatal merge warnings
pub trait Diagnostics: Send + Sync {
    fn warn(&self, message: &str, context: &Value);
}

/// Default diagnostics: `tracing` warnings with the context as a field
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, message: &str, context: &Value) {
        warn!(context = %context, "{}", message);
    }
}

/// Diagnostics that keep every warning in memory
#[derive(Debug, Default)]
pub struct RecordedDiagnostics {
    records: Mutex<Vec<(String, Value)>>,
}

impl RecordedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded `(message, context)` pairs in emission order
    pub fn records(&self) -> Vec<(String, Value)> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|(message, _)| message).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

impl Diagnostics for RecordedDiagnostics {
    fn warn(&self, message: &str, context: &Value) {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push((message.to_string(), context.clone()));
    }
}

/// Adopts a value into the context of the parent it is written into
pub trait ValueAdopter: Send + Sync {
    fn adopt(&self, value: Value, parent: &Value) -> Value;
}

/// Default adopter: returns the value unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl ValueAdopter for PassThrough {
    fn adopt(&self, value: Value, _parent: &Value) -> Value {
        value
    }
}

impl<F> ValueAdopter for F
where
    F: Fn(Value, &Value) -> Value + Send + Sync,
{
    fn adopt(&self, value: Value, parent: &Value) -> Value {
        self(value, parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recorded_diagnostics_keeps_order() {
        let diagnostics = RecordedDiagnostics::new();
        assert!(diagnostics.is_empty());
        diagnostics.warn("first", &json!({"a": 1}));
        diagnostics.warn("second", &json!(null));
        assert_eq!(diagnostics.messages(), vec!["first", "second"]);
        assert_eq!(diagnostics.records()[0].1, json!({"a": 1}));
    }

    #[test]
    fn test_pass_through_and_closure_adopters() {
        let parent = json!({});
        assert_eq!(PassThrough.adopt(json!(5), &parent), json!(5));

        let wrap = |value: Value, _parent: &Value| json!({ "adopted": value });
        assert_eq!(wrap.adopt(json!(5), &parent), json!({"adopted": 5}));
    }
}
