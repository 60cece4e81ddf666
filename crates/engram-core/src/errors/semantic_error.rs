/// Concept graph errors.
///
/// Absent activation sources are skipped silently during spread and are not
/// an error; only similarity queries can fail here.
#[derive(Debug, thiserror::Error)]
pub enum SemanticError {
    #[error("concept embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl SemanticError {
    pub fn kind(&self) -> &'static str {
        match self {
            SemanticError::DimensionMismatch { .. } => "dimension_mismatch",
        }
    }
}
