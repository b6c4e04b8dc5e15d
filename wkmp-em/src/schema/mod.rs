//! Schema registry: where each fragment kind is written inside its entity

pub mod loader;
pub mod registry;
pub mod rule;

pub use loader::{load_schema_file, parse_schema};
pub use registry::{DescriptorBuilder, SchemaRegistry, SchemaRegistryBuilder, StructureDescriptor};
pub use rule::{MatchFn, Matcher, PlacementRule};
