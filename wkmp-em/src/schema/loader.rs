//! External entity schema loading
//!
//! Schema files describe one table per fragment kind:
//!
//! ```toml
//! [entities.albumRelease.albumRelease]
//! placement = "root"
//!
//! [entities.albumRelease.track]
//! placement = "direct"
//! path = "details.tracks"
//!
//! [entities.albumRelease.trackUserDetail]
//! placement = "indexed"
//! parent = "details.tracks"
//! path = "userDetails"
//! match = { data_field = "parentTrack", item_field = "id" }
//! ```
//!
//! `placement` may be omitted: a rule with a `parent` is indexed, a rule with
//! only a `path` is direct, and an empty rule is the root.

use super::registry::SchemaRegistry;
use super::rule::Matcher;
use crate::error::SchemaError;
use crate::kinds::EntityKind;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    #[serde(default)]
    entities: BTreeMap<String, BTreeMap<String, RuleEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleEntry {
    placement: Option<Placement>,
    path: Option<String>,
    parent: Option<String>,
    #[serde(rename = "match")]
    matcher: Option<MatchEntry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Placement {
    Root,
    Direct,
    Indexed,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MatchEntry {
    data_field: String,
    #[serde(default = "default_item_field")]
    item_field: String,
}

fn default_item_field() -> String {
    "id".to_string()
}

impl RuleEntry {
    fn placement(&self) -> Placement {
        match self.placement {
            Some(placement) => placement,
            None if self.parent.is_some() => Placement::Indexed,
            None if self.path.is_some() => Placement::Direct,
            None => Placement::Root,
        }
    }
}

/// Parse a TOML schema document into a registry
pub fn parse_schema(content: &str) -> Result<SchemaRegistry, SchemaError> {
    let file: SchemaFile = toml::from_str(content)?;
    let mut builder = SchemaRegistry::builder();

    for (entity_name, rules) in file.entities {
        let kind: EntityKind = entity_name
            .parse()
            .map_err(|_| SchemaError::UnknownEntityKind(entity_name.clone()))?;

        let mut descriptor = builder.add_entity(kind);
        for (fragment, entry) in rules {
            descriptor = match (entry.placement(), entry) {
                (Placement::Root, RuleEntry { path: None, parent: None, matcher: None, .. }) => {
                    descriptor.root(fragment)
                }
                (Placement::Root, _) => {
                    return Err(SchemaError::invalid_rule(&fragment, "root rule takes no path, parent or match"));
                }
                (Placement::Direct, RuleEntry { path: Some(path), parent: None, matcher: None, .. }) => {
                    descriptor.direct(fragment, path)
                }
                (Placement::Direct, _) => {
                    return Err(SchemaError::invalid_rule(&fragment, "direct rule needs a path and no parent or match"));
                }
                (
                    Placement::Indexed,
                    RuleEntry {
                        path: Some(path),
                        parent: Some(parent),
                        matcher: Some(matcher),
                        ..
                    },
                ) => descriptor.indexed(
                    fragment,
                    parent,
                    path,
                    Matcher::field_equals(matcher.data_field, matcher.item_field),
                ),
                (Placement::Indexed, _) => {
                    return Err(SchemaError::invalid_rule(&fragment, "indexed rule needs a parent, path and match"));
                }
            };
        }
        descriptor.done()?;
    }

    Ok(builder.build())
}

/// Load a TOML schema file
pub fn load_schema_file(path: &Path) -> Result<SchemaRegistry, SchemaError> {
    let content = std::fs::read_to_string(path)?;
    let registry = parse_schema(&content)?;
    info!(
        path = %path.display(),
        entities = registry.entity_kinds().count(),
        "Loaded entity schema"
    );
    Ok(registry)
}
