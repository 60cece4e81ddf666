//! # engram-retrieval
//!
//! The top of the stack: weighted fusion of the three evidence streams and
//! the `CognitiveEngine` that runs the full query pipeline — vector search,
//! episodic retrieval, activation spread, fusion, validation — while
//! assembling a reasoning trace.

mod concepts;
mod engine;
mod fusion;
mod trace;

pub use concepts::extract_concepts;
pub use engine::{CognitiveEngine, NO_RESULTS};
pub use fusion::HybridFusion;
