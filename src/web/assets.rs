//! Static asset serving for non-API paths.
//!
//! Files are looked up under the configured asset root first, so a deployed
//! `public/` directory can override anything; paths with no file on disk
//! fall back to the embedded frontend. Anything else is a 404 handled by
//! the router.

use std::fs;
use std::io::Cursor;
use std::path::{Component, Path};

use tiny_http::{Header, Response, StatusCode};

use super::frontend;

/// Serve a static asset for `url_path`, or `None` when nothing matches.
pub fn serve(asset_dir: &Path, url_path: &str) -> Option<Response<Cursor<Vec<u8>>>> {
    let relative = sanitize(url_path)?;

    if let Ok(bytes) = fs::read(asset_dir.join(&relative)) {
        return Some(file_response(bytes, content_type_for(&relative)));
    }

    embedded(&relative).map(|content| file_response(content.into(), content_type_for(&relative)))
}

/// Embedded frontend files, compiled into the binary.
fn embedded(relative: &str) -> Option<&'static str> {
    match relative {
        "index.html" => Some(frontend::INDEX_HTML),
        "dashboard.js" => Some(frontend::DASHBOARD_JS),
        _ => None,
    }
}

/// Normalize a request path into a safe relative file path.
///
/// `/` maps to `index.html`. Returns `None` for traversal attempts or
/// otherwise non-normal components, which the router turns into a 404.
fn sanitize(url_path: &str) -> Option<String> {
    let trimmed = url_path.trim_start_matches('/');
    if trimmed.is_empty() || trimmed == "index.html" {
        return Some("index.html".to_string());
    }

    let path = Path::new(trimmed);
    if path
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        Some(trimmed.to_string())
    } else {
        None
    }
}

fn file_response(bytes: Vec<u8>, content_type: &str) -> Response<Cursor<Vec<u8>>> {
    // Static header values from compile-time tables are always valid.
    let header = Header::from_bytes("Content-Type", content_type).unwrap();
    Response::from_data(bytes)
        .with_header(header)
        .with_status_code(StatusCode(200))
}

/// Content type from the file extension, `text/plain` when unknown.
pub fn content_type_for(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    match extension.to_ascii_lowercase().as_str() {
        "html" => "text/html; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "ico" => "image/x-icon",
        "woff2" => "font/woff2",
        _ => "text/plain; charset=utf-8",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
