//! JSON API handlers for the two dashboard endpoints.
//!
//! Every handler returns a `Response<Cursor<Vec<u8>>>` with JSON content.
//! Failure bodies are reply-shaped (`{"reply": ...}`) just like success
//! bodies, so the frontend renders every outcome the same way and only the
//! status code distinguishes them.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::analytics;
use crate::config::GrowthboardConfig;
use crate::llm::{self, InsightError};

use super::content_type_json;

/// Fixed reply when the upstream response can't be unwrapped (HTTP 502).
pub const SHAPE_ERROR_REPLY: &str = "Error: Invalid response from AI service.";
/// Fixed reply when the upstream call fails outright (HTTP 500).
pub const CALL_ERROR_REPLY: &str = "Error: Could not generate insight.";
/// Fixed reply for an unparseable request body (HTTP 400).
pub const BAD_REQUEST_REPLY: &str = "Error: Invalid request body.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Insight request body: free text, unvalidated length and content.
#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    /// Missing field degrades to an empty question rather than a 400.
    #[serde(default)]
    pub message: String,
}

/// Insight response body, used for success and failure alike.
#[derive(Debug, Serialize)]
struct InsightResponse {
    reply: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON response with the given status code.
///
/// API responses carry a permissive CORS header so the dashboard can be
/// opened from a file URL or another origin during development.
fn json_response(body: String, status: u16) -> Response<Cursor<Vec<u8>>> {
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_header(super::cors_allow_all())
        .with_status_code(StatusCode(status))
}

fn reply_body(reply: &str) -> Result<String> {
    serde_json::to_string(&InsightResponse {
        reply: reply.to_string(),
    })
    .context("failed to serialize JSON response")
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/data` — the canned analytics payload.
///
/// Always succeeds with the same values; the document is rebuilt per
/// request and nothing is persisted.
pub fn get_data() -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(&analytics::payload())
        .context("failed to serialize JSON response")?;
    Ok(json_response(body, 200))
}

/// `POST /api/insight` — forward the user's question to the completion API.
pub fn post_insight(config: &GrowthboardConfig, body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let (status, body) = insight_outcome(config, body)?;
    Ok(json_response(body, status))
}

/// Status code and JSON body for one insight request.
///
/// Status mapping: 200 with the upstream's text passed through unmodified,
/// 502 when the upstream response had no usable content (raw body logged
/// for diagnosis), 500 when the call itself failed. No retries.
fn insight_outcome(config: &GrowthboardConfig, body: &str) -> Result<(u16, String)> {
    let request: InsightRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(err) => {
            eprintln!("Rejected insight request body: {err}");
            return Ok((400, reply_body(BAD_REQUEST_REPLY)?));
        }
    };

    match llm::generate_insight(&config.insight, &request.message) {
        Ok(reply) => Ok((200, reply_body(&reply)?)),
        Err(err) => {
            match &err {
                InsightError::UpstreamShape { raw } => {
                    eprintln!("AI service returned an unexpected response: {raw}");
                }
                InsightError::UpstreamCall(_) => {
                    eprintln!("Error generating insight: {err}");
                }
            }
            let (status, reply) = error_status(&err);
            Ok((status, reply_body(reply)?))
        }
    }
}

/// Status code and fixed reply for an insight failure.
///
/// The taxonomy is the endpoint's contract: a response the extraction can't
/// unwrap is the upstream's fault (502), a failed call is ours (500).
fn error_status(err: &InsightError) -> (u16, &'static str) {
    match err {
        InsightError::UpstreamShape { .. } => (502, SHAPE_ERROR_REPLY),
        InsightError::UpstreamCall(_) => (500, CALL_ERROR_REPLY),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GrowthboardConfig;

    fn offline_config() -> GrowthboardConfig {
        // No API key: every insight attempt is an upstream-call failure,
        // which keeps these tests off the network.
        let mut config = GrowthboardConfig::default();
        config.insight.api_key = None;
        config
    }

    #[test]
    fn insight_request_deserializes() {
        let req: InsightRequest =
            serde_json::from_str(r#"{"message": "Why is growth accelerating?"}"#).unwrap();
        assert_eq!(req.message, "Why is growth accelerating?");
    }

    #[test]
    fn insight_request_message_defaults_to_empty() {
        let req: InsightRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.message, "");
    }

    #[test]
    fn get_data_answers_200() {
        let response = get_data().unwrap();
        assert_eq!(response.status_code().0, 200);
    }

    #[test]
    fn malformed_body_answers_400_reply_shaped() {
        let (status, body) = insight_outcome(&offline_config(), "not json").unwrap();
        assert_eq!(status, 400);
        assert!(body.contains(BAD_REQUEST_REPLY));
    }

    #[test]
    fn unusable_upstream_shape_maps_to_502_with_fixed_reply() {
        let err = InsightError::UpstreamShape {
            raw: "{}".to_string(),
        };
        assert_eq!(error_status(&err), (502, SHAPE_ERROR_REPLY));
    }

    #[test]
    fn failed_upstream_call_maps_to_500_with_fixed_reply() {
        let err = InsightError::UpstreamCall("connection refused".to_string());
        assert_eq!(error_status(&err), (500, CALL_ERROR_REPLY));
    }

    #[test]
    fn failed_upstream_call_answers_500_reply_shaped() {
        let (status, body) =
            insight_outcome(&offline_config(), r#"{"message": "why?"}"#).unwrap();
        assert_eq!(status, 500);
        assert!(body.contains(CALL_ERROR_REPLY));
    }

    #[test]
    fn reply_body_is_reply_shaped() {
        let body = reply_body("two sentences of insight").unwrap();
        assert_eq!(body, r#"{"reply":"two sentences of insight"}"#);
    }

    #[test]
    fn fixed_reply_strings_are_stable() {
        // The frontend shows these verbatim; changing them is a UI change.
        assert_eq!(SHAPE_ERROR_REPLY, "Error: Invalid response from AI service.");
        assert_eq!(CALL_ERROR_REPLY, "Error: Could not generate insight.");
    }
}
