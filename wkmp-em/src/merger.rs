//! Fragment merger
//!
//! Builds one entity tree from an ordered list of fragments. Each fragment is
//! placed according to its [`PlacementRule`]:
//!
//! 1. `Root` fragments become the entity (only one is allowed)
//! 2. Other fragments resolve a location (optional parent path, optional
//!    collection match), read the placeholder at the rule path and replace it
//!    with the fragment payload after an identifier check
//!
//! Fragments are processed strictly in input order: a fragment that matches
//! against a collection relies on earlier fragments having already resolved
//! that collection's placeholders.

use crate::error::{MergeError, MergeResult};
use crate::fragment::{same_id, slot_id, Fragment};
use crate::hooks::{Diagnostics, PassThrough, TracingDiagnostics, ValueAdopter};
use crate::kinds::EntityKind;
use crate::path::FieldPath;
use crate::schema::{Matcher, PlacementRule, SchemaRegistry};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// How tolerant the merger is of incomplete input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeMode {
    /// Missing root yields no entity; unmatched collection substitutions are no-ops
    #[default]
    Lenient,
    /// Missing root and unmatched collection substitutions are errors
    Strict,
}

impl MergeMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            MergeMode::Strict
        } else {
            MergeMode::Lenient
        }
    }
}

/// Assembles entities from fragments using a shared, read-only schema
#[derive(Clone)]
pub struct FragmentMerger {
    registry: Arc<SchemaRegistry>,
    diagnostics: Arc<dyn Diagnostics>,
    adopter: Arc<dyn ValueAdopter>,
    mode: MergeMode,
}

impl Default for FragmentMerger {
    fn default() -> Self {
        Self::new(SchemaRegistry::builtin())
    }
}

impl FragmentMerger {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            diagnostics: Arc::new(TracingDiagnostics),
            adopter: Arc::new(PassThrough),
            mode: MergeMode::default(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_adopter(mut self, adopter: Arc<dyn ValueAdopter>) -> Self {
        self.adopter = adopter;
        self
    }

    pub fn with_mode(mut self, mode: MergeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Merge `fragments` into one `entity` tree.
    ///
    /// Returns `Ok(None)` for an empty fragment list, and in lenient mode when
    /// no root fragment was supplied.
    pub fn merge(&self, entity: EntityKind, fragments: &[Value]) -> MergeResult<Option<Value>> {
        if fragments.is_empty() {
            return Ok(None);
        }

        let descriptor = self
            .registry
            .descriptor(entity)
            .ok_or_else(|| MergeError::UnsupportedKind(entity.to_string()))?;

        let mut item: Option<Value> = None;

        for (position, raw) in fragments.iter().enumerate() {
            let fragment = Fragment::parse(raw)?;

            let Some(rule) = descriptor.rule(fragment.key) else {
                self.diagnostics.warn("Ignoring unsupported payload", raw);
                continue;
            };

            debug!(entity = %entity, fragment = fragment.key, position, "Merging fragment");
            self.place(&mut item, rule, &fragment, raw)?;
        }

        if item.is_none() {
            if self.mode == MergeMode::Strict {
                return Err(MergeError::MissingRoot);
            }
            self.diagnostics.warn(
                "No root fragment found, entity not assembled",
                &Value::String(entity.to_string()),
            );
        }

        Ok(item)
    }

    /// Merge an optional fragment list; `None` behaves like an empty list
    pub fn merge_opt(&self, entity: EntityKind, fragments: Option<&[Value]>) -> MergeResult<Option<Value>> {
        match fragments {
            Some(fragments) => self.merge(entity, fragments),
            None => Ok(None),
        }
    }

    /// Merge with the entity kind given by name (wire or CLI spelling)
    pub fn merge_named(&self, entity: &str, fragments: &[Value]) -> MergeResult<Option<Value>> {
        if fragments.is_empty() {
            return Ok(None);
        }
        self.merge(entity.parse()?, fragments)
    }

    fn place(
        &self,
        item: &mut Option<Value>,
        rule: &PlacementRule,
        fragment: &Fragment<'_>,
        raw: &Value,
    ) -> MergeResult<()> {
        let (parent_path, path, matcher) = match rule {
            PlacementRule::Root => {
                if item.is_some() {
                    return Err(MergeError::DuplicateRoot(fragment.key.to_string()));
                }
                *item = Some(fragment.data.clone());
                return Ok(());
            }
            PlacementRule::Direct { path } => (None, path, None),
            PlacementRule::Indexed {
                parent_path,
                path,
                matcher,
            } => (Some(parent_path), path, Some(matcher)),
        };

        let Some(root) = item.as_mut() else {
            if let Some(parent) = parent_path {
                return Err(MergeError::ParentNotFound(parent.to_string()));
            }
            self.warn_no_identifier(path, raw);
            return Ok(());
        };

        let (target_path, value) = {
            let (base, target) = locate(root, parent_path, matcher, fragment.data)?;

            let current = match path.get(target) {
                Some(current) if !current.is_null() => current,
                _ => {
                    self.warn_no_identifier(path, raw);
                    return Ok(());
                }
            };

            let target_path = base.join(path);
            let value = self.substitute(current, fragment, &target_path)?;
            let value = self.adopter.adopt(value, target);
            (target_path, value)
        };

        if !target_path.set(root, value) {
            return Err(MergeError::ParentNotFound(target_path.to_string()));
        }
        Ok(())
    }

    /// Value that replaces `current` once `fragment` is merged into it
    fn substitute(&self, current: &Value, fragment: &Fragment<'_>, target_path: &FieldPath) -> MergeResult<Value> {
        let id = fragment.id();

        match current {
            Value::Array(items) => {
                let mut replaced = 0usize;
                let merged: Vec<Value> = items
                    .iter()
                    .map(|element| match (slot_id(element), id) {
                        (Some(existing), Some(id)) if same_id(existing, id) => {
                            replaced += 1;
                            fragment.data.clone()
                        }
                        _ => element.clone(),
                    })
                    .collect();

                if replaced == 0 {
                    if self.mode == MergeMode::Strict {
                        return Err(MergeError::PlaceholderNotFound {
                            path: target_path.to_string(),
                            id: id.cloned().unwrap_or(Value::Null),
                        });
                    }
                    debug!(path = %target_path, fragment = fragment.key, "No placeholder matched, collection unchanged");
                }

                Ok(Value::Array(merged))
            }
            // Only a bare placeholder can be resolved; an object here was merged already.
            Value::Object(_) => Err(MergeError::IdentityMismatch {
                expected: current.clone(),
                found: id.cloned().unwrap_or(Value::Null),
            }),
            _ => match (slot_id(current), id) {
                (Some(expected), Some(found)) if same_id(expected, found) => Ok(fragment.data.clone()),
                (expected, found) => Err(MergeError::IdentityMismatch {
                    expected: expected.unwrap_or(current).clone(),
                    found: found.cloned().unwrap_or(Value::Null),
                }),
            },
        }
    }

    fn warn_no_identifier(&self, path: &FieldPath, raw: &Value) {
        self.diagnostics.warn(
            &format!("No identifier found at \"{}\", ignoring payload", path),
            raw,
        );
    }
}

/// Resolve the location a non-root fragment is written under: the parent path
/// (if any), narrowed to the matching collection element (if any).
fn locate<'a>(
    root: &'a Value,
    parent_path: Option<&FieldPath>,
    matcher: Option<&Matcher>,
    data: &Value,
) -> MergeResult<(FieldPath, &'a Value)> {
    let mut base = FieldPath::root();
    let mut target = root;

    if let Some(parent) = parent_path {
        target = parent
            .get(root)
            .filter(|value| !value.is_null())
            .ok_or_else(|| MergeError::ParentNotFound(parent.to_string()))?;
        base = parent.clone();
    }

    if let Some(matcher) = matcher {
        let Value::Array(items) = target else {
            return Err(MergeError::ExpectedCollection(base.to_string()));
        };
        let (index, element) = items
            .iter()
            .enumerate()
            .find(|(_, element)| matcher.matches(data, element))
            .ok_or_else(|| MergeError::MatchNotFound(base.to_string()))?;
        base = base.index(index);
        target = element;
    }

    Ok((base, target))
}
