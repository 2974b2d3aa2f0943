//! Objection Navigator Contracts
//!
//! Wire shapes for the rebuttal endpoint: the inbound [`ObjectionRequest`],
//! the outbound [`RebuttalResult`] and its envelopes, and the untyped
//! [`RebuttalCandidate`] produced by the completion service or the fallback.

mod rebuttal;

pub use rebuttal::*;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Industry used in the prompt when the request does not name one
pub const DEFAULT_INDUSTRY: &str = "real estate";

/// Validated input for one rebuttal request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectionRequest {
    /// What the prospect said
    pub objection: String,

    /// Caller-assigned objection category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Free-form context for the coach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Industry the seller works in
    #[serde(default = "default_industry")]
    pub industry: String,
}

fn default_industry() -> String {
    DEFAULT_INDUSTRY.to_string()
}

/// Request validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Field 'objection' is required")]
    MissingObjection,
}

impl ObjectionRequest {
    pub fn new(objection: impl Into<String>) -> Self {
        Self {
            objection: objection.into(),
            category: None,
            notes: None,
            industry: default_industry(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = industry.into();
        self
    }

    /// Validate an arbitrary JSON body
    ///
    /// `objection` must be a non-empty string. The optional fields are read
    /// leniently: anything that is not a non-empty string counts as absent.
    pub fn from_value(body: &Value) -> Result<Self, RequestError> {
        let objection = match body.get("objection") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => return Err(RequestError::MissingObjection),
        };

        let optional = |field: &str| -> Option<String> {
            body.get(field)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            objection,
            category: optional("category"),
            notes: optional("notes"),
            industry: optional("industry")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(default_industry),
        })
    }

    /// Parse and validate a raw request body
    ///
    /// A body that is empty or not valid JSON is treated like a body without
    /// an `objection` field.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, RequestError> {
        let body: Value = serde_json::from_slice(bytes).unwrap_or(Value::Null);
        Self::from_value(&body)
    }
}

/// Success body: `{ "result": { ... } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuttalEnvelope {
    pub result: RebuttalResult,
}

/// Error body: `{ "error": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
