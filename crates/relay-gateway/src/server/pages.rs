//! Static page serving
//!
//! The relay core does not depend on these pages; they are plain
//! request/response collaborators serving client assets from disk.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use std::path::Path;

/// Serve one static HTML page from the configured directory
pub async fn serve_page(dir: &str, file: &str) -> Response {
    let path = Path::new(dir).join(file);

    match tokio::fs::read_to_string(&path).await {
        Ok(body) => Html(body).into_response(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "static page unavailable");
            (StatusCode::NOT_FOUND, "page not found").into_response()
        }
    }
}
