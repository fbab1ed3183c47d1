use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Targets of the workspace crates that make up the service.
pub const SERVICE_TARGETS: [&str; 5] = [
    "fund_advisor",
    "ai_llm_service",
    "advisor",
    "knowledge_base",
    "api",
];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Formatting layer used by the binary.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format
/// - `file:line` and target (module path)
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();

    fmt::layer().with_ansi(use_ansi).event_format(
        fmt::format()
            .compact()
            .with_timer(ChronoRfc3339Utc)
            .with_level(true)
            .with_target(true)
            .with_source_location(true),
    )
}

/// Level directives for every service crate, e.g. `advisor=debug`.
pub fn level_directives(level: Level) -> Vec<Directive> {
    let level = level.as_str().to_lowercase();
    SERVICE_TARGETS
        .iter()
        .filter_map(|target| Directive::from_str(&format!("{target}={level}")).ok())
        .collect()
}

/// Creates an `EnvFilter` from `RUST_LOG`, falling back to `default`, and
/// raises the service crates to `level`.
///
/// `RUST_LOG` wins when set: directives are only added on the fallback path.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_directives(level)
            .into_iter()
            .fold(EnvFilter::new(default), EnvFilter::add_directive),
    }
}
