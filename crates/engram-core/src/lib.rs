//! # engram-core
//!
//! Foundation crate for the engram retrieval engine.
//! Defines all shared types, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod text;
pub mod types;
pub mod vecmath;

// Re-export the most commonly used items at the crate root.
pub use config::{EngramConfig, IndexConfig, QueryConfig, SpaceKind, ValidationConfig};
pub use errors::{EngramError, EngramResult};
pub use types::{
    DocumentRecord, Episode, Evidence, FusionWeights, QueryResponse, ReasoningStep, ScoredEpisode,
    ScoredResult, SourceKind, StepKind, ValidationResult,
};
