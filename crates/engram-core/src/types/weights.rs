use serde::{Deserialize, Serialize};

/// Per-source fusion weights. Not necessarily normalized at rest;
/// [`FusionWeights::normalized`] is applied on every assignment and use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    pub vector: f32,
    pub episodic: f32,
    pub semantic: f32,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            vector: 0.6,
            episodic: 0.2,
            semantic: 0.2,
        }
    }
}

impl FusionWeights {
    pub fn new(vector: f32, episodic: f32, semantic: f32) -> Self {
        Self {
            vector,
            episodic,
            semantic,
        }
    }

    /// Equal thirds; the fallback when a weight set degenerates.
    pub fn equal() -> Self {
        Self {
            vector: 1.0 / 3.0,
            episodic: 1.0 / 3.0,
            semantic: 1.0 / 3.0,
        }
    }

    /// Clamp negatives to zero and scale to sum 1. A zero (or negative) sum
    /// after clamping falls back to equal weights.
    pub fn normalized(&self) -> Self {
        let v = self.vector.max(0.0);
        let e = self.episodic.max(0.0);
        let s = self.semantic.max(0.0);
        let sum = v + e + s;
        if sum <= 0.0 {
            return Self::equal();
        }
        Self {
            vector: v / sum,
            episodic: e / sum,
            semantic: s / sum,
        }
    }

    pub fn sum(&self) -> f32 {
        self.vector + self.episodic + self.semantic
    }
}
