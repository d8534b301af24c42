/// Configuration system for growthboard.
///
/// Layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::GrowthboardConfig::default()`]
/// 2. **User global config** — `~/.growthboard/config.toml`
/// 3. **Project local config** — `.growthboard.toml` in the current working directory
/// 4. **Environment variables** — highest precedence
///
/// Later layers override earlier ones. The result is resolved once at
/// startup into an explicit [`GrowthboardConfig`] that is passed by
/// reference to the server and the insight client — no module reads the
/// process environment ad hoc after startup.
pub mod schema;

use std::fs;
use std::path::PathBuf;

pub use schema::{GrowthboardConfig, InsightConfig, ServerConfig};

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved growthboard configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. This is the single entry point for configuration; call it once in
/// `main` and hand the result down.
pub fn load() -> GrowthboardConfig {
    let mut config = GrowthboardConfig::default();

    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    if let Some(project) = load_toml_file(project_config_path()) {
        config = project;
    }

    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed. A broken config file must never stop the dashboard
/// from starting with defaults.
fn load_toml_file(path: Option<PathBuf>) -> Option<GrowthboardConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.growthboard/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".growthboard").join("config.toml"))
}

/// Path to the project local config: `.growthboard.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".growthboard.toml"))
}

/// Return the path to the global config file for display purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `PORT` — listen port
/// - `OPENAI_API_KEY` — upstream API key
/// - `GROWTHBOARD_ASSET_DIR` — static asset directory
/// - `GROWTHBOARD_API_BASE_URL` — upstream base URL
/// - `GROWTHBOARD_MODEL` — completion model name
/// - `GROWTHBOARD_TIMEOUT_MS` — upstream request timeout
fn apply_env_overrides(config: &mut GrowthboardConfig) {
    if let Ok(val) = std::env::var("PORT")
        && let Ok(port) = val.parse::<u16>()
    {
        config.server.port = port;
    }
    if let Ok(val) = std::env::var("OPENAI_API_KEY")
        && !val.is_empty()
    {
        config.insight.api_key = Some(val);
    }
    if let Ok(val) = std::env::var("GROWTHBOARD_ASSET_DIR")
        && !val.is_empty()
    {
        config.server.asset_dir = val;
    }
    if let Ok(val) = std::env::var("GROWTHBOARD_API_BASE_URL")
        && !val.is_empty()
    {
        config.insight.api_base_url = val;
    }
    if let Ok(val) = std::env::var("GROWTHBOARD_MODEL")
        && !val.is_empty()
    {
        config.insight.model = val;
    }
    if let Ok(val) = std::env::var("GROWTHBOARD_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.insight.timeout_ms = ms;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: set an env var (wraps the `unsafe` call).
    ///
    /// # Safety
    /// Must only be called from single-threaded test contexts.
    unsafe fn set_env(key: &str, val: &str) {
        unsafe { std::env::set_var(key, val) }
    }

    /// Helper: remove an env var (wraps the `unsafe` call).
    ///
    /// # Safety
    /// Must only be called from single-threaded test contexts.
    unsafe fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    // Env overrides mutate process-wide state, so they are combined into a
    // single #[test] to avoid racing when Cargo runs tests in parallel.
    #[test]
    fn env_overrides_apply_and_clear() {
        let vars = [
            "PORT",
            "OPENAI_API_KEY",
            "GROWTHBOARD_ASSET_DIR",
            "GROWTHBOARD_API_BASE_URL",
            "GROWTHBOARD_MODEL",
            "GROWTHBOARD_TIMEOUT_MS",
        ];
        for var in vars {
            unsafe { remove_env(var) };
        }

        let mut config = GrowthboardConfig::default();
        apply_env_overrides(&mut config);
        assert_eq!(config.server.port, 3000);
        assert!(config.insight.api_key.is_none());

        unsafe {
            set_env("PORT", "8123");
            set_env("OPENAI_API_KEY", "sk-env");
            set_env("GROWTHBOARD_ASSET_DIR", "assets");
            set_env("GROWTHBOARD_API_BASE_URL", "http://localhost:9999/v1");
            set_env("GROWTHBOARD_MODEL", "gpt-4o");
            set_env("GROWTHBOARD_TIMEOUT_MS", "1500");
        }

        let mut config = GrowthboardConfig::default();
        apply_env_overrides(&mut config);
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.insight.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.server.asset_dir, "assets");
        assert_eq!(config.insight.api_base_url, "http://localhost:9999/v1");
        assert_eq!(config.insight.model, "gpt-4o");
        assert_eq!(config.insight.timeout_ms, 1500);

        // Unparseable numbers are ignored
        unsafe { set_env("PORT", "not-a-port") };
        let mut config = GrowthboardConfig::default();
        apply_env_overrides(&mut config);
        assert_eq!(config.server.port, 3000);

        for var in vars {
            unsafe { remove_env(var) };
        }
    }
}
