//! The ring buffer itself. One exclusive lock; retrieval snapshots under
//! the lock and never mutates episodes in place.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use engram_core::constants::EPISODIC_DECAY_LAMBDA;
use engram_core::errors::EngramResult;
use engram_core::types::{now_ms, Episode, ScoredEpisode};
use engram_core::vecmath;

use crate::persistence;

/// Bounded FIFO ring of episodes with similarity×decay retrieval.
pub struct EpisodicBuffer {
    capacity: usize,
    episodes: Mutex<VecDeque<Episode>>,
}

impl EpisodicBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            episodes: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Episode>> {
        self.episodes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an episode, evicting the oldest first when full.
    /// Timestamps are wall-clock milliseconds captured here.
    pub fn add(
        &self,
        query: &str,
        response: &str,
        embedding: Vec<f32>,
        metadata: HashMap<String, String>,
    ) {
        if self.capacity == 0 {
            return;
        }
        let mut episodes = self.lock();
        if episodes.len() == self.capacity {
            episodes.pop_front();
        }
        episodes.push_back(Episode::new(query, response, embedding, metadata));
        debug!(query, stored = episodes.len(), "episode recorded");
    }

    /// Episodes scored by `cosine(q, e) · exp(−λ·Δt_ms)`, filtered by
    /// `threshold`, sorted descending. Ties break toward the later episode.
    /// An episode whose embedding length differs from the query's scores 0.
    pub fn retrieve_similar(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        threshold: f32,
    ) -> Vec<ScoredEpisode> {
        let episodes = self.lock();
        let now = now_ms();

        let mut scored: Vec<(usize, ScoredEpisode)> = episodes
            .iter()
            .enumerate()
            .filter_map(|(position, episode)| {
                let similarity = vecmath::cosine_similarity(query_embedding, &episode.embedding);
                let age_ms = now.saturating_sub(episode.timestamp_ms) as f32;
                let decay = (-EPISODIC_DECAY_LAMBDA * age_ms).exp();
                let score = similarity * decay;
                (score >= threshold).then(|| {
                    (
                        position,
                        ScoredEpisode {
                            episode: episode.clone(),
                            score,
                        },
                    )
                })
            })
            .collect();

        // Ties break toward the later episode; buffer position covers
        // same-millisecond insertions.
        scored.sort_by(|(pos_a, a), (pos_b, b)| {
            b.score
                .total_cmp(&a.score)
                .then(b.episode.timestamp_ms.cmp(&a.episode.timestamp_ms))
                .then(pos_b.cmp(pos_a))
        });
        scored.truncate(top_k);
        debug!(top_k, threshold, found = scored.len(), "episodic retrieval");
        scored.into_iter().map(|(_, s)| s).collect()
    }

    /// The last `count` episodes in insertion order.
    pub fn get_recent(&self, count: usize) -> Vec<Episode> {
        let episodes = self.lock();
        let skip = episodes.len().saturating_sub(count);
        episodes.iter().skip(skip).cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lock().len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Write all episodes to the versioned episode file.
    pub fn save(&self, path: &Path) -> EngramResult<()> {
        let mut episodes = self.lock();
        persistence::save(episodes.make_contiguous(), path)?;
        info!(path = %path.display(), episodes = episodes.len(), "episodes saved");
        Ok(())
    }

    /// Replace the buffer contents from an episode file. Legacy files
    /// without embeddings load with zero-filled vectors and the
    /// `embedding_zero_filled` flag set.
    pub fn load(&self, path: &Path) -> EngramResult<()> {
        let loaded = persistence::load(path)?;
        let mut episodes = self.lock();
        episodes.clear();
        let count = loaded.len();
        for episode in loaded {
            if episodes.len() == self.capacity {
                episodes.pop_front();
            }
            if self.capacity > 0 {
                episodes.push_back(episode);
            }
        }
        info!(path = %path.display(), episodes = count, "episodes loaded");
        Ok(())
    }
}
