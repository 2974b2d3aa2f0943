//! Objection Navigator
//!
//! An HTTP service that coaches salespeople through prospect objections.
//! Each request carries an objection (plus optional category, notes and
//! industry) and is answered with an ADA+C rebuttal: Acknowledge,
//! Differentiate, Anchor, Close, and a full spoken script.
//!
//! ## Architecture
//!
//! 1. **Contracts** (`contracts/`): request validation and the wire shapes of
//!    the result, the envelope and error bodies.
//!
//! 2. **Engine** (`engine/`): prompt construction, the canned fallback and
//!    the sanitizer that coerces any candidate into a complete result.
//!
//! 3. **Client** (`client/`): the [`client::CompletionService`] seam and its
//!    OpenAI-compatible implementation.
//!
//! 4. **Handler** (`handler/`): routes, CORS, and per-request credential
//!    resolution through `objection-secrets`.
//!
//! 5. **Telemetry** (`telemetry/`): Prometheus counters for request outcomes
//!    and completion failures.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Serve the endpoint
//! objection-navigator serve --port 8080
//!
//! # One rebuttal, printed as JSON
//! objection-navigator generate --objection "It's too expensive" --category Price
//!
//! # Show the prompt that would be sent
//! objection-navigator prompt --objection "We already have an agency"
//! ```

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod server;
pub mod telemetry;

#[path = "../contracts/mod.rs"]
pub mod contracts;

pub use config::ServiceConfig;
pub use contracts::*;
pub use engine::{Rebuttal, RebuttalEngine, RebuttalSource};
pub use error::{Result, ServiceError};
pub use handler::{create_router, AppState};
pub use server::build_app;

/// Service identifier reported by `/health`
pub const AGENT_ID: &str = "objection-navigator";

/// Crate version reported by `/health`
pub const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");
