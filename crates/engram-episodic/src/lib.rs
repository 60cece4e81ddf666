//! # engram-episodic
//!
//! Fixed-capacity FIFO ring of past (query, response) interactions.
//! Retrieval scores episodes by cosine similarity against the query
//! embedding times an exponential recency decay.

mod buffer;
mod persistence;

pub use buffer::EpisodicBuffer;
