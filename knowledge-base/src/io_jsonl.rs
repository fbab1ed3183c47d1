//! JSONL corpus reader.
//!
//! One `{"id", "text", "source"?}` object per line. Blank lines are skipped;
//! any malformed line aborts the load with its 1-based line number.

use std::io::{BufRead, BufReader};
use std::{fs::File, path::Path};

use tracing::{debug, info};

use crate::errors::KnowledgeBaseError;
use crate::record::Document;

/// Reads every document from `jsonl_path`.
///
/// # Errors
/// - [`KnowledgeBaseError::Io`] if the file cannot be read.
/// - [`KnowledgeBaseError::Parse`] if a line is not a valid document, or its
///   `text` is blank.
pub fn read_documents(jsonl_path: impl AsRef<Path>) -> Result<Vec<Document>, KnowledgeBaseError> {
    info!("Reading knowledge base JSONL: {:?}", jsonl_path.as_ref());

    let file = File::open(jsonl_path.as_ref())?;
    read_documents_from(BufReader::new(file))
}

/// Same as [`read_documents`], over any buffered reader.
pub fn read_documents_from(reader: impl BufRead) -> Result<Vec<Document>, KnowledgeBaseError> {
    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let doc: Document =
            serde_json::from_str(&line).map_err(|e| KnowledgeBaseError::Parse {
                line: i + 1,
                reason: e.to_string(),
            })?;
        if doc.text.trim().is_empty() {
            return Err(KnowledgeBaseError::Parse {
                line: i + 1,
                reason: format!("document `{}` has empty text", doc.id),
            });
        }
        out.push(doc);
    }

    debug!("Loaded {} documents", out.len());
    Ok(out)
}
