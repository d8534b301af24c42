//! AI insight generation — prompt templating plus the upstream call.
//!
//! The insight endpoint's whole job is request/response shaping: wrap the
//! user's question in the fixed growth-analyst prompt, call the hosted
//! model once, and unwrap the reply defensively. The error taxonomy is the
//! endpoint's contract: shape errors map to HTTP 502, call errors to 500,
//! and neither is ever retried.

pub mod client;
pub mod prompts;

use thiserror::Error;

pub use client::CompletionClient;
use crate::config::InsightConfig;

/// Failure modes of one insight request.
#[derive(Debug, Error)]
pub enum InsightError {
    /// The upstream answered, but no usable message content could be
    /// extracted. Carries the raw body for the server log.
    #[error("upstream response had no usable message content")]
    UpstreamShape { raw: String },
    /// The upstream call itself failed: transport, auth, rate limit, or a
    /// missing API key.
    #[error("completion call failed: {0}")]
    UpstreamCall(String),
}

/// Generate one insight for the user's message.
///
/// Builds the composite prompt and sends it under the configured model.
/// The upstream's reply text is returned unmodified.
pub fn generate_insight(config: &InsightConfig, message: &str) -> Result<String, InsightError> {
    let client = CompletionClient::from_config(config);
    let prompt = prompts::build_insight_prompt(message);
    client.complete(&prompt)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
