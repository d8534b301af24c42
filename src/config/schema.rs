/// Configuration schema and defaults for growthboard.
///
/// Two TOML sections: `[server]` (listen port, static asset root) and
/// `[insight]` (the upstream chat-completion endpoint). Every field has a
/// built-in default; users only set what they want to override.
use serde::{Deserialize, Serialize};

/// Top-level growthboard configuration.
///
/// Maps directly to the `~/.growthboard/config.toml` and `.growthboard.toml`
/// file schemas. Missing sections and fields fall back to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthboardConfig {
    pub server: ServerConfig,
    pub insight: InsightConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on. Can also be set via `PORT`.
    pub port: u16,
    /// Directory served for non-API paths. Files missing from this directory
    /// fall back to the embedded frontend.
    pub asset_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            asset_dir: "public".to_string(),
        }
    }
}

impl ServerConfig {
    /// Bind address in `host:port` form.
    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

// ---------------------------------------------------------------------------
// [insight]
// ---------------------------------------------------------------------------

/// Upstream chat-completion settings for the AI insight endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Base URL of the OpenAI-compatible API.
    pub api_base_url: String,
    /// Model used for every insight request.
    pub model: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Bearer token for the upstream API. Usually supplied via the
    /// `OPENAI_API_KEY` environment variable rather than the config file.
    /// When absent the server still starts; insight requests fail with 500.
    pub api_key: Option<String>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_ms: 30_000,
            api_key: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
