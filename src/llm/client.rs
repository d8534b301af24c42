/// OpenAI-compatible chat-completion client for the insight endpoint.
///
/// Talks to `POST {base}/chat/completions` with the synchronous `ureq`
/// client. One request per insight; no retries, no streaming, no state
/// shared across requests. The upstream response is read defensively: the
/// completion body is kept as raw JSON and the reply text is extracted by
/// path, so a missing or reshaped field becomes a reportable
/// [`InsightError::UpstreamShape`] instead of a deserialization panic.
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::InsightError;
use crate::config::InsightConfig;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A single message in a chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous chat-completion client.
///
/// Built once from the resolved [`InsightConfig`] and shared by reference;
/// it holds no mutable state, so concurrent requests through it are safe.
#[derive(Debug)]
pub struct CompletionClient {
    base_url: String,
    model: String,
    timeout: Duration,
    api_key: Option<String>,
}

impl CompletionClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &InsightConfig) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            api_key: config.api_key.clone(),
        }
    }

    /// Whether an API key is configured at all.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Check whether the upstream API answers at all.
    ///
    /// Uses `GET /models` with a short timeout so `growthboard health`
    /// doesn't stall when the service is unreachable. Auth failures still
    /// count as reachable — the endpoint answered.
    pub fn is_reachable(&self) -> bool {
        let url = format!("{}/models", self.base_url);
        let mut req = ureq::get(&url).timeout(Duration::from_secs(5));
        if let Some(key) = &self.api_key {
            req = req.set("Authorization", &format!("Bearer {key}"));
        }
        match req.call() {
            Ok(_) => true,
            Err(ureq::Error::Status(_, _)) => true,
            Err(_) => false,
        }
    }

    /// Send one prompt and return the first completion's text.
    ///
    /// Error mapping follows the insight endpoint's contract:
    /// - transport/auth/status failures and a missing API key are
    ///   [`InsightError::UpstreamCall`] (HTTP 500 at the endpoint);
    /// - a response the extraction can't find text in is
    ///   [`InsightError::UpstreamShape`] carrying the raw body for the
    ///   server log (HTTP 502).
    pub fn complete(&self, prompt: &str) -> Result<String, InsightError> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            InsightError::UpstreamCall("no API key configured".to_string())
        })?;

        let url = format!("{}/chat/completions", self.base_url);
        let messages = [ChatMessage::user(prompt)];
        let body = CompletionRequest {
            model: &self.model,
            messages: &messages,
        };

        let response = ureq::post(&url)
            .set("Authorization", &format!("Bearer {key}"))
            .timeout(self.timeout)
            .send_json(&body)
            .map_err(|e| InsightError::UpstreamCall(e.to_string()))?;

        let raw = response
            .into_string()
            .map_err(|e| InsightError::UpstreamCall(format!("failed to read response body: {e}")))?;

        let value: Value = serde_json::from_str(&raw)
            .map_err(|_| InsightError::UpstreamShape { raw: raw.clone() })?;

        extract_reply(&value).ok_or(InsightError::UpstreamShape { raw })
    }

    /// Model name for logging and health output.
    pub fn model_name(&self) -> &str {
        &self.model
    }
}

/// Pull the first completion's text out of a chat-completion response.
///
/// Walks `choices[0].message.content`; returns `None` when any hop is
/// absent, not a string, or blank. Non-blank content is passed through
/// unmodified, surrounding whitespace included.
pub fn extract_reply(value: &Value) -> Option<String> {
    let content = value.pointer("/choices/0/message/content")?.as_str()?;
    if content.trim().is_empty() {
        return None;
    }
    Some(content.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> CompletionClient {
        CompletionClient::from_config(&InsightConfig::default())
    }

    #[test]
    fn client_from_default_config() {
        let client = client();
        assert_eq!(client.base_url, "https://api.openai.com/v1");
        assert_eq!(client.model_name(), "gpt-4o-mini");
        assert_eq!(client.timeout, Duration::from_millis(30_000));
        assert!(!client.has_api_key());
    }

    #[test]
    fn client_strips_trailing_slash() {
        let mut config = InsightConfig::default();
        config.api_base_url = "http://localhost:8080/v1/".to_string();
        let client = CompletionClient::from_config(&config);
        assert_eq!(client.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn complete_without_key_is_a_call_error() {
        let err = client().complete("hello").unwrap_err();
        assert!(matches!(err, InsightError::UpstreamCall(_)));
    }

    #[test]
    fn extract_reply_reads_first_choice() {
        let value = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Audiobooks growth is driven by..."}}
            ]
        });
        assert_eq!(
            extract_reply(&value).as_deref(),
            Some("Audiobooks growth is driven by...")
        );
    }

    #[test]
    fn extract_reply_rejects_missing_fields() {
        assert_eq!(extract_reply(&json!({})), None);
        assert_eq!(extract_reply(&json!({"choices": []})), None);
        assert_eq!(extract_reply(&json!({"choices": [{"message": {}}]})), None);
        assert_eq!(
            extract_reply(&json!({"choices": [{"message": {"content": 42}}]})),
            None
        );
    }

    #[test]
    fn extract_reply_rejects_blank_content() {
        let value = json!({"choices": [{"message": {"content": "   \n"}}]});
        assert_eq!(extract_reply(&value), None);
    }

    #[test]
    fn extract_reply_preserves_surrounding_whitespace() {
        let value = json!({"choices": [{"message": {"content": "  insight text  "}}]});
        assert_eq!(extract_reply(&value).as_deref(), Some("  insight text  "));
    }
}
