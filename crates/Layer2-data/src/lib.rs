//! # pulse-data
//!
//! Data access layer for PlantPulse:
//! - `DataSource` trait: uniform, strictly read-only, provenance-annotated
//! - `CompositeSource`: routes operation categories to concrete stores
//! - `MemorySource` / `SqliteSource`: concrete implementations
//! - Fuzzy name resolution with ranked alternates

pub mod composite;
pub mod fuzzy;
pub mod memory;
pub mod source;
pub mod sqlite;

pub use composite::CompositeSource;
pub use fuzzy::{rank_candidates, similarity, NameMatch, ResolvedName, MATCH_THRESHOLD};
pub use memory::MemorySource;
pub use source::{
    default_collection, row_matches, Citation, DataRequest, DataResult, DataSource,
    OperationCategory,
};
pub use sqlite::SqliteSource;
