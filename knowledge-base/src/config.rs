//! Runtime configuration of the knowledge base.

use std::path::PathBuf;

use crate::errors::KnowledgeBaseError;

pub const DEFAULT_PATH: &str = "data/knowledge_base.jsonl";
pub const DEFAULT_EMBEDDING_DIM: usize = 384;
pub const DEFAULT_MIN_SCORE: f32 = 0.15;

/// Where the corpus lives and how it is searched.
#[derive(Clone, Debug, PartialEq)]
pub struct KnowledgeBaseConfig {
    /// JSONL corpus file.
    pub path: PathBuf,
    /// Hashing embedder dimension.
    pub embedding_dim: usize,
    /// Minimum cosine similarity for a document to count as context.
    pub min_score: f32,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PATH),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl KnowledgeBaseConfig {
    /// Reads `KNOWLEDGE_BASE_PATH`, `EMBEDDING_DIM` and `RETRIEVAL_MIN_SCORE`,
    /// falling back to defaults for unset variables.
    ///
    /// # Errors
    /// [`KnowledgeBaseError::Config`] on unparsable or out-of-range values.
    pub fn from_env() -> Result<Self, KnowledgeBaseError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`KnowledgeBaseConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, KnowledgeBaseError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(path) = var("KNOWLEDGE_BASE_PATH") {
            cfg.path = PathBuf::from(path.trim());
        }
        if let Some(dim) = var("EMBEDDING_DIM") {
            cfg.embedding_dim = dim.trim().parse().map_err(|_| {
                KnowledgeBaseError::Config(format!("EMBEDDING_DIM must be a positive integer, got `{dim}`"))
            })?;
        }
        if let Some(score) = var("RETRIEVAL_MIN_SCORE") {
            cfg.min_score = score.trim().parse().map_err(|_| {
                KnowledgeBaseError::Config(format!("RETRIEVAL_MIN_SCORE must be a number, got `{score}`"))
            })?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), KnowledgeBaseError> {
        if self.embedding_dim == 0 {
            return Err(KnowledgeBaseError::Config("embedding_dim must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(KnowledgeBaseError::Config(
                "min_score must be within [0.0, 1.0]".into(),
            ));
        }
        Ok(())
    }
}
