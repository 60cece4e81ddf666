//! # engram-semantic
//!
//! Directed weighted concept graph. Activation spreads outward from seed
//! concepts by bounded-hop BFS, decaying along edges; concepts can also be
//! looked up directly by embedding similarity.

mod activation;
mod network;

pub use network::{ConceptNetwork, ConceptNode};
