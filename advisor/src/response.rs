//! Response record and fallback texts.

use std::time::Duration;

use serde::{Serialize, Serializer};

/// Shown to the client when the pipeline itself fails.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error. Please try again later.";

const FALLBACK_WITH_CONTEXT: &str = "Sorry, the answer generation service is temporarily unavailable. \
Here is the information from our knowledge base:\n\n";

const FALLBACK_NO_CONTEXT: &str = "Sorry, the service is temporarily unavailable. \
Please contact our specialists by phone or through the website.";

/// Answer to one question.
///
/// Serialized as `{"response", "context_found", "processing_time"}` with
/// `processing_time` in seconds rounded to milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResponse {
    #[serde(rename = "response")]
    pub response_text: String,
    pub context_found: bool,
    #[serde(serialize_with = "seconds_3dp")]
    pub processing_time: Duration,
}

/// Local answer used when generation fails; echoes `context` verbatim when present.
pub fn fallback_answer(context: Option<&str>) -> String {
    match context {
        Some(ctx) => format!("{FALLBACK_WITH_CONTEXT}{ctx}"),
        None => FALLBACK_NO_CONTEXT.to_string(),
    }
}

fn seconds_3dp<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64((d.as_secs_f64() * 1000.0).round() / 1000.0)
}
