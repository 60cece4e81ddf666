//! Engine configuration.
//!
//! One sub-config per subsystem, all serde round-trippable, all with
//! defaults matching the engine's stock tuning.

pub mod defaults;

mod index_config;
mod query_config;
mod validation_config;

pub use index_config::{IndexConfig, SpaceKind};
pub use query_config::QueryConfig;
pub use validation_config::ValidationConfig;

use serde::{Deserialize, Serialize};

use crate::types::FusionWeights;

/// Top-level engine configuration: one field per component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngramConfig {
    /// Vector index parameters.
    pub index: IndexConfig,
    /// Episodic ring buffer capacity.
    pub episodic_capacity: usize,
    /// Initial fusion weights (normalized on use).
    pub fusion: FusionWeights,
    /// Validator thresholds and phrase lists.
    pub validation: ValidationConfig,
}

impl Default for EngramConfig {
    fn default() -> Self {
        Self {
            index: IndexConfig::default(),
            episodic_capacity: defaults::DEFAULT_EPISODIC_CAPACITY,
            fusion: FusionWeights::default(),
            validation: ValidationConfig::default(),
        }
    }
}
