//! In-process completion doubles
//!
//! Used by the unit and integration tests, and handy when wiring the router
//! without network access.

use std::sync::Mutex;

use super::{CompletionError, CompletionService};
use crate::contracts::RebuttalCandidate;

/// Always answers with the same candidate and records every call
pub struct StaticCompletion {
    candidate: RebuttalCandidate,
    calls: Mutex<Vec<(String, String)>>,
}

impl StaticCompletion {
    pub fn new(candidate: RebuttalCandidate) -> Self {
        Self {
            candidate,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(api_key, prompt)` pairs in call order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl CompletionService for StaticCompletion {
    async fn complete(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> Result<RebuttalCandidate, CompletionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((api_key.to_string(), prompt.to_string()));
        }
        Ok(self.candidate.clone())
    }
}

/// Always fails with a fixed kind of error
pub struct FailingCompletion {
    make_error: fn() -> CompletionError,
}

impl FailingCompletion {
    pub fn network() -> Self {
        Self {
            make_error: || CompletionError::Network("connection refused".to_string()),
        }
    }

    pub fn malformed() -> Self {
        Self {
            make_error: || CompletionError::Malformed("expected an object".to_string()),
        }
    }

    pub fn empty() -> Self {
        Self {
            make_error: || CompletionError::EmptyContent,
        }
    }
}

#[async_trait::async_trait]
impl CompletionService for FailingCompletion {
    async fn complete(
        &self,
        _api_key: &str,
        _prompt: &str,
    ) -> Result<RebuttalCandidate, CompletionError> {
        Err((self.make_error)())
    }
}

/// Panics on every call
pub struct PanickingCompletion;

#[async_trait::async_trait]
impl CompletionService for PanickingCompletion {
    async fn complete(
        &self,
        _api_key: &str,
        _prompt: &str,
    ) -> Result<RebuttalCandidate, CompletionError> {
        panic!("completion double asked to panic")
    }
}
