//! Core data models used by the library.

use serde::{Deserialize, Serialize};

/// One corpus entry as stored on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub source: Option<String>,
}

/// A single retrieval hit with its cosine score.
#[derive(Clone, Debug)]
pub struct SearchHit {
    pub score: f32,
    pub id: String,
    pub text: String,
}

/// Size of the loaded corpus, reported by `/stats` and `/health`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct KnowledgeBaseStats {
    pub total_documents: usize,
    pub embedding_dimension: usize,
}
