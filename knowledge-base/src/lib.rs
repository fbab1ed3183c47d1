//! Retrieval collaborator for the fund advisor.
//!
//! This crate provides:
//! - the [`KnowledgeBase`] seam the orchestrator depends on
//! - [`InMemoryKnowledgeBase`], a JSONL-backed store ranked by cosine similarity
//!   over [`HashingEmbedder`] vectors
//!
//! The design is flat (no deep nesting) and splits responsibilities into focused modules.

mod config;
mod embed;
mod errors;
mod io_jsonl;
mod record;
mod store;

pub use config::{DEFAULT_EMBEDDING_DIM, DEFAULT_MIN_SCORE, DEFAULT_PATH, KnowledgeBaseConfig};
pub use embed::{EmbeddingsProvider, HashingEmbedder};
pub use errors::KnowledgeBaseError;
pub use io_jsonl::{read_documents, read_documents_from};
pub use record::{Document, KnowledgeBaseStats, SearchHit};

use tracing::{info, trace};

/// Separator between retrieved passages in the context block.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Semantic lookup used by the request pipeline.
///
/// Calls are synchronous; async callers run them on the blocking pool.
pub trait KnowledgeBase: Send + Sync {
    /// Returns up to `top_k` relevant passages joined into one context block,
    /// or an empty string when nothing is relevant.
    fn search(&self, query: &str, top_k: usize) -> Result<String, KnowledgeBaseError>;

    /// Corpus size and vector dimension.
    fn stats(&self) -> KnowledgeBaseStats;
}

/// Brute-force in-memory knowledge base.
pub struct InMemoryKnowledgeBase {
    embedder: Box<dyn EmbeddingsProvider>,
    store: store::MemoryStore,
    min_score: f32,
}

impl InMemoryKnowledgeBase {
    /// Embeds `docs` with `embedder` and keeps them in memory.
    ///
    /// # Errors
    /// Returns [`KnowledgeBaseError::Config`] for a `min_score` outside `[0, 1]`.
    pub fn new(
        docs: Vec<Document>,
        embedder: Box<dyn EmbeddingsProvider>,
        min_score: f32,
    ) -> Result<Self, KnowledgeBaseError> {
        if !(0.0..=1.0).contains(&min_score) {
            return Err(KnowledgeBaseError::Config(
                "min_score must be within [0.0, 1.0]".into(),
            ));
        }
        let store = store::MemoryStore::build(docs, embedder.as_ref());
        Ok(Self {
            embedder,
            store,
            min_score,
        })
    }

    /// Loads the corpus named by `cfg` and embeds it with a [`HashingEmbedder`].
    ///
    /// # Errors
    /// Returns config, I/O, or parse errors, and
    /// [`KnowledgeBaseError::EmptyCorpus`] when the file has no documents.
    pub fn load(cfg: &KnowledgeBaseConfig) -> Result<Self, KnowledgeBaseError> {
        cfg.validate()?;
        let docs = read_documents(&cfg.path)?;
        if docs.is_empty() {
            return Err(KnowledgeBaseError::EmptyCorpus(cfg.path.display().to_string()));
        }

        let kb = Self::new(
            docs,
            Box::new(HashingEmbedder::new(cfg.embedding_dim)),
            cfg.min_score,
        )?;
        info!(
            path = %cfg.path.display(),
            documents = kb.store.len(),
            dim = cfg.embedding_dim,
            min_score = cfg.min_score,
            "knowledge base loaded"
        );
        Ok(kb)
    }

    /// Ranked hits for `query`, best first.
    pub fn hits(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
        let qv = self.embedder.embed(query);
        self.store.search(&qv, top_k, self.min_score)
    }
}

impl KnowledgeBase for InMemoryKnowledgeBase {
    fn search(&self, query: &str, top_k: usize) -> Result<String, KnowledgeBaseError> {
        let hits = self.hits(query, top_k);
        trace!(
            hits = hits.len(),
            best = hits.first().map(|h| h.score).unwrap_or_default(),
            "knowledge base search"
        );
        Ok(hits
            .into_iter()
            .map(|h| h.text)
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR))
    }

    fn stats(&self) -> KnowledgeBaseStats {
        KnowledgeBaseStats {
            total_documents: self.store.len(),
            embedding_dimension: self.embedder.dimension(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn doc(id: &str, text: &str) -> Document {
        Document {
            id: id.into(),
            text: text.into(),
            source: None,
        }
    }

    fn corpus() -> Vec<Document> {
        vec![
            doc(
                "unit",
                "An investment unit is a registered security certifying a share in a mutual fund.",
            ),
            doc(
                "testing",
                "Qualification testing checks that a non-qualified investor understands the product before purchase.",
            ),
            doc(
                "risks",
                "Investing in a closed-end fund carries market risk, liquidity risk and manager risk.",
            ),
        ]
    }

    fn kb(min_score: f32) -> InMemoryKnowledgeBase {
        InMemoryKnowledgeBase::new(corpus(), Box::new(HashingEmbedder::new(384)), min_score)
            .unwrap()
    }

    #[test]
    fn best_match_comes_first() {
        let kb = kb(0.0);
        let hits = kb.hits("What risks does a closed-end fund carry?", 3);
        assert_eq!(hits[0].id, "risks");
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn search_joins_top_k_with_blank_lines() {
        let kb = kb(0.0);
        let ctx = kb.search("investment unit share fund risk", 2).unwrap();
        assert_eq!(ctx.matches(CONTEXT_SEPARATOR).count(), 1);
    }

    #[test]
    fn threshold_filters_unrelated_queries() {
        let kb = kb(0.3);
        assert_eq!(kb.search("weather tomorrow in paris", 3).unwrap(), "");
    }

    #[test]
    fn empty_query_finds_nothing() {
        assert_eq!(kb(0.0).search("   ", 3).unwrap(), "");
    }

    #[test]
    fn stats_report_corpus_shape() {
        assert_eq!(
            kb(0.15).stats(),
            KnowledgeBaseStats {
                total_documents: 3,
                embedding_dimension: 384
            }
        );
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        assert!(matches!(
            InMemoryKnowledgeBase::new(corpus(), Box::new(HashingEmbedder::new(8)), -0.1),
            Err(KnowledgeBaseError::Config(_))
        ));
    }

    #[test]
    fn load_rejects_empty_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let cfg = KnowledgeBaseConfig {
            path: f.path().to_path_buf(),
            ..Default::default()
        };
        assert!(matches!(
            InMemoryKnowledgeBase::load(&cfg),
            Err(KnowledgeBaseError::EmptyCorpus(_))
        ));
    }

    #[test]
    fn load_reads_jsonl() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        for d in corpus() {
            writeln!(f, "{}", serde_json::to_string(&d).unwrap()).unwrap();
        }
        let cfg = KnowledgeBaseConfig {
            path: f.path().to_path_buf(),
            ..Default::default()
        };
        let kb = InMemoryKnowledgeBase::load(&cfg).unwrap();
        assert_eq!(kb.stats().total_documents, 3);
        assert!(kb.search("qualification testing", 3).unwrap().contains("Qualification testing"));
    }
}
