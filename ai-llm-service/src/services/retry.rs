//! Attempt loop shared by completion calls.
//!
//! Each attempt reports an [`AttemptOutcome`]; the loop maps it through a
//! fixed table:
//!
//! | Outcome        | not last attempt                 | last attempt                |
//! |----------------|----------------------------------|-----------------------------|
//! | `Success`      | return `Ok`                      | return `Ok`                 |
//! | `Transient`    | wait `retry_delay`, retry        | return that failure         |
//! | `RateLimited`  | wait `backoff_base * 2^attempt`  | return `AttemptsExhausted`  |
//! | `Terminal`     | return that failure              | return that failure         |
//!
//! A rate-limited response consumes its attempt slot; the budget is never
//! extended. No wait is inserted after the final attempt.
//!
//! Every attempt runs under `attempt_timeout`. Exceeding it is a transient
//! [`GenerationError::Timeout`].

use std::{future::Future, time::Duration};

use tracing::{debug, warn};

use crate::error_handler::GenerationError;

/// Result of a single attempt, before retry policy is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The endpoint answered with text.
    Success(String),
    /// The endpoint asked us to slow down (HTTP 429).
    RateLimited,
    /// Worth retrying after a fixed delay.
    Transient(GenerationError),
    /// Retrying cannot help.
    Terminal(GenerationError),
}

impl From<GenerationError> for AttemptOutcome {
    /// Network and timeout failures are transient; everything else is terminal.
    fn from(err: GenerationError) -> Self {
        if err.is_transient() {
            AttemptOutcome::Transient(err)
        } else {
            AttemptOutcome::Terminal(err)
        }
    }
}

/// Attempt budget and delays. One "unit" is one second in production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Wait after a transient failure.
    pub retry_delay: Duration,
    /// Rate-limit wait is `backoff_base * 2^attempt`.
    pub backoff_base: Duration,
    /// Deadline for one attempt.
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    /// Three attempts, one-second delays, and the given per-attempt deadline.
    pub fn standard(attempt_timeout: Duration) -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
            backoff_base: Duration::from_secs(1),
            attempt_timeout,
        }
    }

    /// Rate-limit wait before retrying after `attempt` (0-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }
}

/// What the loop did, for logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryReport {
    /// Attempts actually issued.
    pub attempts: u32,
    /// Total time spent sleeping between attempts.
    pub waited: Duration,
}

/// Runs `attempt` until it succeeds, fails terminally, or the budget is spent.
///
/// `attempt` receives the 0-based attempt index. Attempts never overlap.
pub async fn run_with_retry<F, Fut>(
    policy: &RetryPolicy,
    mut attempt: F,
) -> (Result<String, GenerationError>, RetryReport)
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = AttemptOutcome>,
{
    let mut report = RetryReport::default();

    for n in 0..policy.max_attempts {
        let last = n + 1 == policy.max_attempts;
        report.attempts += 1;

        let outcome = match tokio::time::timeout(policy.attempt_timeout, attempt(n)).await {
            Ok(outcome) => outcome,
            Err(_) => AttemptOutcome::Transient(GenerationError::Timeout(policy.attempt_timeout)),
        };

        let wait = match outcome {
            AttemptOutcome::Success(text) => {
                debug!(attempt = n + 1, "attempt succeeded");
                return (Ok(text), report);
            }
            AttemptOutcome::Terminal(err) => return (Err(err), report),
            AttemptOutcome::Transient(err) if last => return (Err(err), report),
            AttemptOutcome::Transient(err) => {
                warn!(attempt = n + 1, error = %err, "transient failure, retrying");
                policy.retry_delay
            }
            AttemptOutcome::RateLimited if last => {
                warn!(attempt = n + 1, "rate limited on final attempt");
                break;
            }
            AttemptOutcome::RateLimited => {
                let wait = policy.backoff_for(n);
                warn!(attempt = n + 1, wait_ms = wait.as_millis(), "rate limited, backing off");
                wait
            }
        };

        tokio::time::sleep(wait).await;
        report.waited += wait;
    }

    (
        Err(GenerationError::AttemptsExhausted {
            attempts: report.attempts,
        }),
        report,
    )
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            retry_delay: Duration::from_millis(1),
            backoff_base: Duration::from_millis(1),
            attempt_timeout: Duration::from_millis(50),
        }
    }

    #[test]
    fn backoff_doubles() {
        let p = RetryPolicy::standard(Duration::from_secs(30));
        assert_eq!(p.backoff_for(0), Duration::from_secs(1));
        assert_eq!(p.backoff_for(1), Duration::from_secs(2));
        assert_eq!(p.backoff_for(2), Duration::from_secs(4));
        assert_eq!(p.backoff_for(40), Duration::from_secs(u32::MAX as u64));
    }

    #[tokio::test]
    async fn rate_limits_then_success_waits_one_plus_two_units() {
        let p = fast_policy();
        let (res, report) = run_with_retry(&p, |n| async move {
            match n {
                0 | 1 => AttemptOutcome::RateLimited,
                _ => AttemptOutcome::Success("answer".into()),
            }
        })
        .await;

        assert_eq!(res, Ok("answer".to_string()));
        assert_eq!(report.attempts, 3);
        assert_eq!(report.waited, p.backoff_base * 3);
    }

    #[tokio::test]
    async fn three_timeouts_surface_timeout() {
        let p = fast_policy();
        let (res, report) = run_with_retry(&p, |_| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            AttemptOutcome::Success("too late".into())
        })
        .await;

        assert_eq!(res, Err(GenerationError::Timeout(p.attempt_timeout)));
        assert_eq!(report.attempts, 3);
        assert_eq!(report.waited, p.retry_delay * 2);
    }

    #[tokio::test]
    async fn terminal_failure_stops_immediately() {
        let p = fast_policy();
        let (res, report) = run_with_retry(&p, |_| async {
            AttemptOutcome::Terminal(GenerationError::Api {
                status: 401,
                excerpt: "bad key".into(),
            })
        })
        .await;

        assert!(matches!(res, Err(GenerationError::Api { status: 401, .. })));
        assert_eq!(report.attempts, 1);
        assert_eq!(report.waited, Duration::ZERO);
    }

    #[tokio::test]
    async fn rate_limited_to_the_end_is_exhausted() {
        let p = fast_policy();
        let (res, report) = run_with_retry(&p, |_| async { AttemptOutcome::RateLimited }).await;

        assert_eq!(res, Err(GenerationError::AttemptsExhausted { attempts: 3 }));
        // 1 + 2 units; nothing after the final attempt.
        assert_eq!(report.waited, p.backoff_base * 3);
    }

    #[tokio::test]
    async fn last_attempt_kind_is_reported() {
        let p = fast_policy();
        let (res, _) = run_with_retry(&p, |n| async move {
            if n < 2 {
                AttemptOutcome::Transient(GenerationError::Timeout(Duration::from_millis(50)))
            } else {
                AttemptOutcome::Transient(GenerationError::Network("connection reset".into()))
            }
        })
        .await;

        assert_eq!(res, Err(GenerationError::Network("connection reset".into())));
    }

    #[tokio::test]
    async fn network_blip_recovers() {
        let p = fast_policy();
        let (res, report) = run_with_retry(&p, |n| async move {
            if n == 0 {
                AttemptOutcome::Transient(GenerationError::Network("refused".into()))
            } else {
                AttemptOutcome::Success("ok".into())
            }
        })
        .await;

        assert_eq!(res, Ok("ok".to_string()));
        assert_eq!(report.attempts, 2);
        assert_eq!(report.waited, p.retry_delay);
    }

    #[tokio::test]
    async fn zero_budget_never_calls() {
        let mut p = fast_policy();
        p.max_attempts = 0;
        let calls = AtomicU32::new(0);
        let (res, report) = run_with_retry(&p, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { AttemptOutcome::Success("unused".into()) }
        })
        .await;

        assert_eq!(res, Err(GenerationError::AttemptsExhausted { attempts: 0 }));
        assert_eq!(report.attempts, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
