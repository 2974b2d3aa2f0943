//! Rebuttal engine
//!
//! The linear pipeline behind the endpoint: prompt → completion → (fallback
//! on any failure) → sanitize. The one branch point is whether the
//! completion call produced a candidate.

mod fallback;
mod prompt;
mod sanitizer;

pub use fallback::{fallback_candidate, FALLBACK_CATEGORY};
pub use prompt::build_prompt;
pub use sanitizer::sanitize;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::client::{CompletionError, CompletionService};
use crate::contracts::{ObjectionRequest, RebuttalResult};

/// Where a rebuttal came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuttalSource {
    /// The completion service answered with a usable object
    Completion,
    /// The canned fallback replaced a failed completion
    Fallback { reason: &'static str },
    /// The caller asked for the fallback without calling the service
    Offline,
}

impl RebuttalSource {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, RebuttalSource::Completion)
    }
}

/// Outcome of one pipeline run
#[derive(Debug, Clone)]
pub struct Rebuttal {
    pub result: RebuttalResult,
    pub source: RebuttalSource,
    /// Time spent waiting on the completion service
    pub completion_time: Duration,
}

pub struct RebuttalEngine {
    completion: Arc<dyn CompletionService>,
}

impl RebuttalEngine {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    /// Run the pipeline for one validated request
    ///
    /// Never fails: every completion error is logged and replaced by the
    /// fallback.
    pub async fn generate(&self, request: &ObjectionRequest, api_key: &str) -> Rebuttal {
        let prompt = build_prompt(
            &request.objection,
            request.category.as_deref(),
            request.notes.as_deref(),
            &request.industry,
        );

        let started = Instant::now();
        let outcome = self.completion.complete(api_key, &prompt).await;
        let completion_time = started.elapsed();

        let (candidate, source) = match outcome {
            Ok(candidate) => (candidate, RebuttalSource::Completion),
            Err(err) => {
                log_completion_failure(&err, completion_time);
                (
                    fallback_candidate(request.category.as_deref()),
                    RebuttalSource::Fallback {
                        reason: err.reason(),
                    },
                )
            }
        };

        Rebuttal {
            result: sanitize(&candidate, request.category.as_deref()),
            source,
            completion_time,
        }
    }

    /// The sanitized fallback for a request, without calling the service
    pub fn offline(&self, request: &ObjectionRequest) -> Rebuttal {
        let candidate = fallback_candidate(request.category.as_deref());
        Rebuttal {
            result: sanitize(&candidate, request.category.as_deref()),
            source: RebuttalSource::Offline,
            completion_time: Duration::ZERO,
        }
    }
}

fn log_completion_failure(err: &CompletionError, elapsed: Duration) {
    tracing::warn!(
        error = %err,
        reason = err.reason(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Completion failed, using fallback"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::{FailingCompletion, StaticCompletion};
    use crate::contracts::RebuttalCandidate;
    use serde_json::json;

    #[tokio::test]
    async fn test_uses_completion_output() {
        let candidate = RebuttalCandidate::from_value(json!({
            "acknowledge": " Fair. ",
            "differentiate": "Different.",
            "anchor": "Anchor.",
            "close": "Close?",
            "script": "Script.",
            "category": "Price Objection"
        }))
        .unwrap();
        let engine = RebuttalEngine::new(Arc::new(StaticCompletion::new(candidate)));

        let rebuttal = engine
            .generate(&ObjectionRequest::new("It's too expensive"), "sk-test")
            .await;

        assert_eq!(rebuttal.source, RebuttalSource::Completion);
        assert_eq!(rebuttal.result.acknowledge, "Fair.");
        assert_eq!(rebuttal.result.category, "Price Objection");
    }

    #[tokio::test]
    async fn test_falls_back_on_failure() {
        let engine = RebuttalEngine::new(Arc::new(FailingCompletion::network()));
        let request = ObjectionRequest::new("It's too expensive");

        let rebuttal = engine.generate(&request, "sk-test").await;

        assert_eq!(
            rebuttal.source,
            RebuttalSource::Fallback { reason: "network" }
        );
        assert_eq!(rebuttal.result, sanitize(&fallback_candidate(None), None));
        assert_eq!(rebuttal.result.category, FALLBACK_CATEGORY);
    }

    #[tokio::test]
    async fn test_fallback_keeps_request_category() {
        let engine = RebuttalEngine::new(Arc::new(FailingCompletion::malformed()));
        let request = ObjectionRequest::new("Not now").with_category("Timing Objection");

        let rebuttal = engine.generate(&request, "sk-test").await;

        assert!(rebuttal.source.is_fallback());
        assert_eq!(rebuttal.result.category, "Timing Objection");
    }

    #[tokio::test]
    async fn test_passes_rendered_prompt_and_key() {
        let completion = Arc::new(StaticCompletion::new(RebuttalCandidate::new()));
        let engine = RebuttalEngine::new(completion.clone());
        let request = ObjectionRequest::new("Send me info")
            .with_notes("Cold lead")
            .with_industry("insurance");

        engine.generate(&request, "sk-abc").await;

        let calls = completion.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "sk-abc");
        assert_eq!(
            calls[0].1,
            build_prompt("Send me info", None, Some("Cold lead"), "insurance")
        );
    }

    #[tokio::test]
    async fn test_request_category_fills_empty_completion_category() {
        let candidate = RebuttalCandidate::new().with("close", "Ready?");
        let engine = RebuttalEngine::new(Arc::new(StaticCompletion::new(candidate)));
        let request = ObjectionRequest::new("Hmm").with_category("Trust");

        let rebuttal = engine.generate(&request, "k").await;

        assert_eq!(rebuttal.source, RebuttalSource::Completion);
        assert_eq!(rebuttal.result.close, "Ready?");
        assert_eq!(rebuttal.result.acknowledge, "");
        assert_eq!(rebuttal.result.category, "Trust");
    }

    #[test]
    fn test_offline_is_sanitized_fallback() {
        let engine = RebuttalEngine::new(Arc::new(FailingCompletion::network()));
        let rebuttal = engine.offline(&ObjectionRequest::new("x"));
        assert_eq!(rebuttal.source, RebuttalSource::Offline);
        assert_eq!(rebuttal.result, sanitize(&fallback_candidate(None), None));
    }
}
