//! Canned ADA+C rebuttal
//!
//! Served whenever the completion service fails. Deterministic and free of
//! side effects.

use crate::contracts::{fields, RebuttalCandidate};

/// Category used when the caller did not supply one
pub const FALLBACK_CATEGORY: &str = "Price Objection";

const ACKNOWLEDGE: &str = "Yeah, it's not cheap. Good marketing that works never is.";
const DIFFERENTIATE: &str = "But you're not buying ads or design. You're buying closings. \
This system is built to turn strangers into signed clients — without you chasing.";
const ANCHOR: &str =
    "Your average deal is $8K to $15K. One close covers the cost. After that, it’s profit.";
const CLOSE: &str = "Are you trying to save money, or make more money?";

/// Build the fallback candidate for a category
pub fn fallback_candidate(category: Option<&str>) -> RebuttalCandidate {
    let category = category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(FALLBACK_CATEGORY);

    RebuttalCandidate::new()
        .with(fields::ACKNOWLEDGE, ACKNOWLEDGE)
        .with(fields::DIFFERENTIATE, DIFFERENTIATE)
        .with(fields::ANCHOR, ANCHOR)
        .with(fields::CLOSE, CLOSE)
        .with(fields::SCRIPT, fallback_script())
        .with(fields::CATEGORY, category)
}

fn fallback_script() -> String {
    format!(
        "Acknowledge: {}\n\nDifferentiate: {}\n\nAnchor: {}\n\nClose: {}",
        ACKNOWLEDGE, DIFFERENTIATE, ANCHOR, CLOSE
    )
}
