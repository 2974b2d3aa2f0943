//! Telemetry for Objection Navigator
//!
//! Prometheus metrics for the rebuttal endpoint. Structured logs go through
//! `tracing` at the call sites; this module only counts.

pub mod metrics;

pub use metrics::RebuttalMetrics;

/// How a request to the rebuttal endpoint ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
    /// 200 with completion output
    Success,
    /// 200 with fallback output
    Fallback,
    /// 400
    Invalid,
    /// 500, credential missing
    Misconfigured,
    /// 405
    MethodNotAllowed,
    /// 500 from the outer guard
    InternalError,
}

impl RequestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestOutcome::Success => "success",
            RequestOutcome::Fallback => "fallback",
            RequestOutcome::Invalid => "invalid",
            RequestOutcome::Misconfigured => "misconfigured",
            RequestOutcome::MethodNotAllowed => "method_not_allowed",
            RequestOutcome::InternalError => "internal_error",
        }
    }
}
