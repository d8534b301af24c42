//! HTTP server for the growthboard dashboard.
//!
//! A small worker pool over `tiny_http` handles requests concurrently;
//! handlers share nothing mutable, so workers need no coordination. Routes:
//!
//! - `GET /api/data` — canned analytics payload
//! - `POST /api/insight` — AI insight generation
//! - anything else — static assets, falling back to the embedded frontend
//!
//! A per-request failure answers 500 and the server keeps accepting
//! requests; nothing here is process-fatal.

pub mod api;
pub mod assets;
pub mod frontend;

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use colored::Colorize;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::config::GrowthboardConfig;

/// Request handler threads sharing the accept queue.
const WORKERS: usize = 4;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server and block until it shuts down.
///
/// Warns (but continues) when no API key is configured: the dashboard and
/// `/api/data` work fine without one, and insight requests fail per request
/// instead of preventing startup.
pub fn serve(config: &GrowthboardConfig) -> Result<()> {
    let addr = config.server.addr();
    let server = Server::http(&addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    if config.insight.api_key.is_none() {
        eprintln!(
            "{} OPENAI_API_KEY is not set. Insight requests will fail until it is.",
            "warning:".yellow().bold()
        );
    }

    println!(
        "growthboard dashboard running at http://localhost:{}",
        config.server.port
    );
    println!("Press Ctrl+C to stop.\n");

    let server = Arc::new(server);
    let config = Arc::new(config.clone());

    let handles: Vec<_> = (0..WORKERS)
        .map(|_| {
            let server = Arc::clone(&server);
            let config = Arc::clone(&config);
            thread::spawn(move || worker_loop(&server, &config))
        })
        .collect();

    for handle in handles {
        let _ = handle.join();
    }

    Ok(())
}

/// Accept and answer requests until the server shuts down.
fn worker_loop(server: &Server, config: &GrowthboardConfig) {
    loop {
        let mut request = match server.recv() {
            Ok(request) => request,
            Err(_) => break,
        };

        let method = request.method().clone();
        let url = request.url().to_string();

        // Read the body up-front for methods that carry one
        let body = if matches!(method, Method::Post | Method::Put | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let status = match dispatch(config, &method, &url, body.as_deref()) {
            Ok(response) => {
                let status = response.status_code().0;
                let _ = request.respond(response);
                status
            }
            Err(err) => {
                let body = serde_json::json!({ "reply": format!("Error: {err}") }).to_string();
                let response = Response::from_data(body.into_bytes())
                    .with_header(content_type_json())
                    .with_status_code(StatusCode(500));
                let _ = request.respond(response);
                500
            }
        };

        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    config: &GrowthboardConfig,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/api/data") => api::get_data(),
        (&Method::Post, "/api/insight") => api::post_insight(config, body.unwrap_or("{}")),

        // CORS preflight for the API routes
        (&Method::Options, "/api/data") | (&Method::Options, "/api/insight") => Ok(preflight()),

        // Everything else is a static asset or the embedded frontend
        (&Method::Get, _) => Ok(assets::serve(Path::new(&config.server.asset_dir), path)
            .unwrap_or_else(not_found)),

        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// 404 response.
fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = r#"{"error": "not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

/// Empty CORS preflight response.
fn preflight() -> Response<Cursor<Vec<u8>>> {
    Response::from_data(Vec::new())
        .with_header(cors_allow_all())
        .with_header(
            Header::from_bytes("Access-Control-Allow-Headers", "Content-Type").unwrap(),
        )
        .with_header(
            Header::from_bytes("Access-Control-Allow-Methods", "GET, POST, OPTIONS").unwrap(),
        )
        .with_status_code(StatusCode(204))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap()
}

/// Permissive CORS header for API responses.
pub(crate) fn cors_allow_all() -> Header {
    Header::from_bytes("Access-Control-Allow-Origin", "*").unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GrowthboardConfig;

    fn offline_config() -> GrowthboardConfig {
        let mut config = GrowthboardConfig::default();
        config.insight.api_key = None;
        config.server.asset_dir = "definitely-missing-dir".to_string();
        config
    }

    #[test]
    fn data_route_dispatches() {
        let response = dispatch(&offline_config(), &Method::Get, "/api/data", None).unwrap();
        assert_eq!(response.status_code().0, 200);
    }

    #[test]
    fn query_string_is_ignored_for_routing() {
        let response =
            dispatch(&offline_config(), &Method::Get, "/api/data?cache=0", None).unwrap();
        assert_eq!(response.status_code().0, 200);
    }

    #[test]
    fn insight_route_requires_post() {
        let response = dispatch(&offline_config(), &Method::Get, "/api/insight", None).unwrap();
        // GET on the insight route falls through to assets and 404s
        assert_eq!(response.status_code().0, 404);
    }

    #[test]
    fn insight_route_answers_reply_shaped_errors() {
        let response = dispatch(
            &offline_config(),
            &Method::Post,
            "/api/insight",
            Some(r#"{"message": "why?"}"#),
        )
        .unwrap();
        assert_eq!(response.status_code().0, 500);
    }

    #[test]
    fn root_serves_the_embedded_frontend() {
        let response = dispatch(&offline_config(), &Method::Get, "/", None).unwrap();
        assert_eq!(response.status_code().0, 200);
    }

    #[test]
    fn unknown_path_is_404() {
        let response = dispatch(&offline_config(), &Method::Get, "/missing.css", None).unwrap();
        assert_eq!(response.status_code().0, 404);
    }

    #[test]
    fn preflight_answers_204() {
        let response = dispatch(&offline_config(), &Method::Options, "/api/insight", None).unwrap();
        assert_eq!(response.status_code().0, 204);
    }
}
