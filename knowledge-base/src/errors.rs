//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for knowledge-base operations.
#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A corpus line could not be parsed.
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The corpus file contained no documents.
    #[error("knowledge base is empty: {0}")]
    EmptyCorpus(String),
}
