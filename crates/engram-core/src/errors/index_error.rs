/// Vector index errors.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("index is full (max_elements: {max_elements})")]
    CapacityExceeded { max_elements: usize },

    #[error("invalid index configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("snapshot failure at {path}: {reason}")]
    Persistence { path: String, reason: String },
}

impl IndexError {
    pub fn kind(&self) -> &'static str {
        match self {
            IndexError::DimensionMismatch { .. } => "dimension_mismatch",
            IndexError::CapacityExceeded { .. } => "capacity_exceeded",
            IndexError::InvalidConfig { .. } => "invalid_config",
            IndexError::Persistence { .. } => "persistence_error",
        }
    }
}
