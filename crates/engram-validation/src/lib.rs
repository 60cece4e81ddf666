//! # engram-validation
//!
//! Scores a response against the evidence collected for it: evidence
//! sufficiency, hedging language, unsupported factual claims, and lexical
//! overlap. The outcome is a value, never an error.

mod engine;

pub use engine::{
    ValidationEngine, FLAG_HEDGING, FLAG_INSUFFICIENT_EVIDENCE, FLAG_UNSUBSTANTIATED_CLAIMS,
};
