/// Episodic buffer errors.
#[derive(Debug, thiserror::Error)]
pub enum EpisodicError {
    #[error("episode file failure at {path}: {reason}")]
    Persistence { path: String, reason: String },
}

impl EpisodicError {
    pub fn kind(&self) -> &'static str {
        match self {
            EpisodicError::Persistence { .. } => "persistence_error",
        }
    }
}
