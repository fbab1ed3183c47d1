//! Validated user question.

use std::fmt;

use thiserror::Error;

/// Upper bound on the raw input, in Unicode scalar values.
pub const MAX_QUERY_CHARS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("query must not be empty")]
    Empty,

    #[error("query is {chars} characters long, at most {max} allowed")]
    TooLong { chars: usize, max: usize },
}

/// A trimmed, non-empty question of bounded length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Validates `raw` and trims surrounding whitespace.
    ///
    /// The length limit applies to `raw` as received, before trimming.
    ///
    /// ```
    /// use advisor::{Query, QueryError};
    ///
    /// assert_eq!(Query::parse("  What is a unit? ").unwrap().as_str(), "What is a unit?");
    /// assert_eq!(Query::parse(" \n "), Err(QueryError::Empty));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let chars = raw.chars().count();
        if chars > MAX_QUERY_CHARS {
            return Err(QueryError::TooLong {
                chars,
                max: MAX_QUERY_CHARS,
            });
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `max` characters, for logs.
    pub fn preview(&self, max: usize) -> &str {
        match self.0.char_indices().nth(max) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
