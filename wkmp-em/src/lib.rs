//! # wkmp-em - Entity Merger
//!
//! Assembles catalog entities (album releases with their details, user
//! details, artists, tracks and per-track user details) from independently
//! fetched fragments.
//!
//! A [`SchemaRegistry`] says where each fragment kind is written inside its
//! entity; the [`FragmentMerger`] walks an ordered fragment list, places each
//! fragment over the placeholder identifier waiting for it, and returns the
//! whole entity or a [`MergeError`].
//!
//! ```
//! use serde_json::json;
//! use wkmp_em::{EntityKind, FragmentMerger};
//!
//! let merger = FragmentMerger::default();
//! let entity = merger
//!     .merge(
//!         EntityKind::AlbumRelease,
//!         &[
//!             json!({"albumRelease": {"id": 1, "details": 1}}),
//!             json!({"albumReleaseDetail": {"id": 1, "tracks": [100, 101]}}),
//!             json!({"track": {"id": 100, "name": "A"}}),
//!         ],
//!     )
//!     .unwrap();
//!
//! assert_eq!(
//!     entity,
//!     Some(json!({"id": 1, "details": {"id": 1, "tracks": [{"id": 100, "name": "A"}, 101]}}))
//! );
//! ```

pub mod error;
pub mod fragment;
pub mod hooks;
pub mod kinds;
pub mod merger;
pub mod path;
pub mod schema;

pub use error::{MergeError, MergeResult, SchemaError};
pub use fragment::Fragment;
pub use hooks::{Diagnostics, PassThrough, RecordedDiagnostics, TracingDiagnostics, ValueAdopter};
pub use kinds::{EntityKind, FragmentKind};
pub use merger::{FragmentMerger, MergeMode};
pub use path::{FieldPath, PathSegment};
pub use schema::{Matcher, PlacementRule, SchemaRegistry, StructureDescriptor};
