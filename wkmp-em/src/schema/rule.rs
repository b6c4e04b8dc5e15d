//! Placement rules and collection matchers

use crate::fragment::same_id;
use crate::path::FieldPath;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Predicate signature for code-defined matchers: `(fragment_data, element)`
pub type MatchFn = dyn Fn(&Value, &Value) -> bool + Send + Sync;

/// Locates the element of a collection that an indexed fragment belongs to
#[derive(Clone)]
pub enum Matcher {
    /// `fragment_data[data_field]` equals `element[item_field]`
    FieldEquals {
        data_field: String,
        item_field: String,
    },
    /// Arbitrary predicate over `(fragment_data, element)`
    Custom(Arc<MatchFn>),
}

impl Matcher {
    pub fn field_equals(data_field: impl Into<String>, item_field: impl Into<String>) -> Self {
        Matcher::FieldEquals {
            data_field: data_field.into(),
            item_field: item_field.into(),
        }
    }

    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        Matcher::Custom(Arc::new(predicate))
    }

    pub fn matches(&self, data: &Value, element: &Value) -> bool {
        match self {
            Matcher::FieldEquals {
                data_field,
                item_field,
            } => {
                // Bare placeholders have no fields to compare against
                match (data.get(data_field), element.as_object().and_then(|m| m.get(item_field))) {
                    (Some(wanted), Some(actual)) if !wanted.is_null() => same_id(wanted, actual),
                    _ => false,
                }
            }
            Matcher::Custom(predicate) => predicate(data, element),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::FieldEquals {
                data_field,
                item_field,
            } => f
                .debug_struct("FieldEquals")
                .field("data_field", data_field)
                .field("item_field", item_field)
                .finish(),
            Matcher::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Where a fragment kind is written inside its entity
#[derive(Debug, Clone)]
pub enum PlacementRule {
    /// The fragment is the whole entity
    Root,
    /// The fragment replaces the placeholder at a fixed path
    Direct { path: FieldPath },
    /// The fragment replaces the placeholder at `path` under the element of
    /// the `parent_path` collection selected by `matcher`
    Indexed {
        parent_path: FieldPath,
        path: FieldPath,
        matcher: Matcher,
    },
}

impl PlacementRule {
    pub fn is_root(&self) -> bool {
        matches!(self, PlacementRule::Root)
    }
}
