//! Immutable schema registry and its builder

use super::rule::{Matcher, PlacementRule};
use crate::error::SchemaError;
use crate::kinds::{EntityKind, FragmentKind};
use crate::path::FieldPath;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;

/// Placement rules for every fragment kind composing one entity kind
#[derive(Debug, Clone, Default)]
pub struct StructureDescriptor {
    rules: HashMap<String, PlacementRule>,
}

impl StructureDescriptor {
    pub fn rule(&self, fragment_key: &str) -> Option<&PlacementRule> {
        self.rules.get(fragment_key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Read-only mapping of entity kind → structure descriptor
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entities: HashMap<EntityKind, StructureDescriptor>,
}

static BUILTIN: Lazy<Arc<SchemaRegistry>> = Lazy::new(|| {
    let registry = build_builtin().unwrap_or_else(|e| {
        error!(error = %e, "Built-in schema rejected, no entity kinds registered");
        SchemaRegistry::default()
    });
    Arc::new(registry)
});

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::new()
    }

    /// Process-wide album release schema
    pub fn builtin() -> Arc<SchemaRegistry> {
        Arc::clone(&BUILTIN)
    }

    pub fn descriptor(&self, entity: EntityKind) -> Option<&StructureDescriptor> {
        self.entities.get(&entity)
    }

    pub fn lookup(&self, entity: EntityKind, fragment_key: &str) -> Option<&PlacementRule> {
        self.descriptor(entity)?.rule(fragment_key)
    }

    pub fn entity_kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.entities.keys().copied()
    }
}

fn build_builtin() -> Result<SchemaRegistry, SchemaError> {
    let mut builder = SchemaRegistry::builder();
    builder
        .add_entity(EntityKind::AlbumRelease)
        .root(FragmentKind::AlbumRelease)
        .direct(FragmentKind::AlbumReleaseDetail, "details")
        .direct(FragmentKind::AlbumReleaseUserDetail, "userDetails")
        .direct(FragmentKind::Artist, "primaryArtists")
        .direct(FragmentKind::Track, "details.tracks")
        .indexed(
            FragmentKind::TrackUserDetail,
            "details.tracks",
            "userDetails",
            Matcher::field_equals("parentTrack", "id"),
        )
        .done()?;
    Ok(builder.build())
}

/// Builder for constructing an immutable [`SchemaRegistry`]
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    entities: HashMap<EntityKind, StructureDescriptor>,
}

impl SchemaRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start describing an entity kind
    pub fn add_entity(&mut self, kind: EntityKind) -> DescriptorBuilder<'_> {
        DescriptorBuilder {
            builder: self,
            kind,
            pending: Vec::new(),
        }
    }

    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            entities: self.entities,
        }
    }
}

enum PendingRule {
    Root,
    Direct {
        path: String,
    },
    Indexed {
        parent: String,
        path: String,
        matcher: Matcher,
    },
}

/// Collects the rules of one entity kind; validated on [`DescriptorBuilder::done`]
pub struct DescriptorBuilder<'a> {
    builder: &'a mut SchemaRegistryBuilder,
    kind: EntityKind,
    pending: Vec<(String, PendingRule)>,
}

impl DescriptorBuilder<'_> {
    pub fn root(mut self, fragment: impl Into<String>) -> Self {
        self.pending.push((fragment.into(), PendingRule::Root));
        self
    }

    pub fn direct(mut self, fragment: impl Into<String>, path: impl Into<String>) -> Self {
        self.pending
            .push((fragment.into(), PendingRule::Direct { path: path.into() }));
        self
    }

    pub fn indexed(
        mut self,
        fragment: impl Into<String>,
        parent: impl Into<String>,
        path: impl Into<String>,
        matcher: Matcher,
    ) -> Self {
        self.pending.push((
            fragment.into(),
            PendingRule::Indexed {
                parent: parent.into(),
                path: path.into(),
                matcher,
            },
        ));
        self
    }

    /// Validate paths and uniqueness, then register the descriptor
    pub fn done(self) -> Result<(), SchemaError> {
        if self.builder.entities.contains_key(&self.kind) {
            return Err(SchemaError::DuplicateEntity(self.kind.to_string()));
        }

        let mut rules = HashMap::new();
        let mut has_root = false;

        for (fragment, pending) in self.pending {
            let rule = match pending {
                PendingRule::Root => {
                    if has_root {
                        return Err(SchemaError::MultipleRoots(self.kind.to_string()));
                    }
                    has_root = true;
                    PlacementRule::Root
                }
                PendingRule::Direct { path } => PlacementRule::Direct {
                    path: FieldPath::parse(&path)?,
                },
                PendingRule::Indexed {
                    parent,
                    path,
                    matcher,
                } => PlacementRule::Indexed {
                    parent_path: FieldPath::parse(&parent)?,
                    path: FieldPath::parse(&path)?,
                    matcher,
                },
            };

            if rules.contains_key(&fragment) {
                return Err(SchemaError::DuplicateFragment {
                    entity: self.kind.to_string(),
                    fragment,
                });
            }
            rules.insert(fragment, rule);
        }

        self.builder
            .entities
            .insert(self.kind, StructureDescriptor { rules });
        Ok(())
    }
}
