//! Shared data model for the retrieval pipeline.

mod document;
mod episode;
mod evidence;
mod reasoning;
mod response;
mod scored_result;
mod validation;
mod weights;

pub use document::DocumentRecord;
pub use episode::{now_ms, Episode, ScoredEpisode};
pub use evidence::Evidence;
pub use reasoning::{overall_confidence, ReasoningStep, StepKind};
pub use response::{BatchIndexOutcome, QueryResponse};
pub use scored_result::{ScoredResult, SourceKind};
pub use validation::ValidationResult;
pub use weights::FusionWeights;
