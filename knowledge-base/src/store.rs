//! In-memory vector store with brute-force cosine ranking.

use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::embed::{EmbeddingsProvider, cosine};
use crate::record::{Document, SearchHit};

/// Documents paired with their precomputed vectors.
pub(crate) struct MemoryStore {
    docs: Vec<Document>,
    vectors: Vec<Vec<f32>>,
}

impl MemoryStore {
    pub(crate) fn build(docs: Vec<Document>, embedder: &dyn EmbeddingsProvider) -> Self {
        let vectors = docs.iter().map(|d| embedder.embed(&d.text)).collect();
        debug!(documents = docs.len(), dim = embedder.dimension(), "embedded corpus");
        Self { docs, vectors }
    }

    pub(crate) fn len(&self) -> usize {
        self.docs.len()
    }

    /// Hits with `score >= min_score`, best first, at most `top_k`.
    ///
    /// Ties keep corpus order.
    pub(crate) fn search(&self, query: &[f32], top_k: usize, min_score: f32) -> Vec<SearchHit> {
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine(query, v)))
            .filter(|(_, s)| *s > 0.0 && *s >= min_score)
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        trace!(candidates = scored.len(), top_k, min_score, "memory search");

        scored
            .into_iter()
            .map(|(i, score)| SearchHit {
                score,
                id: self.docs[i].id.clone(),
                text: self.docs[i].text.clone(),
            })
            .collect()
    }
}
