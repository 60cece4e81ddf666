//! Error types for the engram workspace.
//!
//! Each subsystem has its own error enum; `EngramError` is the top-level
//! union that crosses the engine boundary. Every error maps to a stable
//! kind tag via [`EngramError::kind`], which is what the terminal `error`
//! reasoning step of a failed query carries.

mod episodic_error;
mod index_error;
mod semantic_error;

pub use episodic_error::EpisodicError;
pub use index_error::IndexError;
pub use semantic_error::SemanticError;

/// Workspace-wide result alias.
pub type EngramResult<T> = Result<T, EngramError>;

/// Top-level error union crossing the engine boundary.
#[derive(Debug, thiserror::Error)]
pub enum EngramError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Episodic(#[from] EpisodicError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    /// A component error surfaced through the query pipeline, tagged with
    /// the pipeline stage that raised it.
    #[error("query processing failed at {stage}: {source}")]
    QueryProcessing {
        stage: &'static str,
        #[source]
        source: Box<EngramError>,
    },
}

impl EngramError {
    /// Stable snake_case kind tag for this error.
    ///
    /// `QueryProcessing` reports its own kind; callers that want the
    /// underlying cause should match on the variant and inspect `source`.
    pub fn kind(&self) -> &'static str {
        match self {
            EngramError::Index(e) => e.kind(),
            EngramError::Episodic(e) => e.kind(),
            EngramError::Semantic(e) => e.kind(),
            EngramError::QueryProcessing { .. } => "query_processing_error",
        }
    }
}
