//! Static file serving with SPA fallback.
//!
//! Every request maps onto a file under the output directory. Paths that
//! do not exist, or that name a directory, get the root `index.html` so a
//! client-side router can take over.

use crate::dev::index::INDEX_FILE;
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Serve a file from the output directory, or `index.html` in its place.
///
/// Stateless apart from read-only filesystem access.
pub async fn serve_file(State(out_dir): State<Arc<PathBuf>>, uri: Uri) -> Response {
    if let Some(path) = resolve(&out_dir, uri.path()) {
        if let Ok(meta) = tokio::fs::metadata(&path).await {
            if meta.is_file() {
                return read_file(&path).await;
            }
        }
    }

    let index = out_dir.join(INDEX_FILE);
    if tokio::fs::metadata(&index).await.is_ok_and(|meta| meta.is_file()) {
        return read_file(&index).await;
    }

    tracing::debug!(path = uri.path(), "no index.html to fall back to");
    with_headers(
        StatusCode::NOT_FOUND,
        "text/plain; charset=utf-8",
        format!("Not found: {}", uri.path()).into_bytes(),
    )
}

/// Map a request path onto the output directory.
///
/// The path is percent-decoded first. Only plain segments of the decoded
/// path are accepted; anything that could climb out of the directory, or
/// that is not valid UTF-8 once decoded, yields `None`.
fn resolve(out_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path).decode_utf8().ok()?;
    let relative = Path::new(decoded.trim_start_matches('/'));
    let mut path = out_dir.to_path_buf();

    for component in relative.components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }

    Some(path)
}

async fn read_file(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(content) => with_headers(StatusCode::OK, content_type(path), content),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to read file");
            with_headers(
                StatusCode::INTERNAL_SERVER_ERROR,
                "text/plain; charset=utf-8",
                format!("Failed to read {}", path.display()).into_bytes(),
            )
        }
    }
}

fn with_headers(status: StatusCode, content_type: &'static str, body: Vec<u8>) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
        ],
        body,
    )
        .into_response()
}

/// Content type from file extension.
fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    match extension {
        "html" | "htm" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript",
        "css" => "text/css",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_plain_path() {
        let out = Path::new("/srv/dist");
        assert_eq!(
            resolve(out, "/assets/app.js"),
            Some(PathBuf::from("/srv/dist/assets/app.js"))
        );
        assert_eq!(resolve(out, "/"), Some(PathBuf::from("/srv/dist")));
    }

    #[test]
    fn test_resolve_rejects_parent() {
        let out = Path::new("/srv/dist");
        assert_eq!(resolve(out, "/../secret"), None);
        assert_eq!(resolve(out, "/a/../../etc/passwd"), None);
    }

    #[test]
    fn test_resolve_decodes_percent_escapes() {
        let out = Path::new("/srv/dist");
        assert_eq!(
            resolve(out, "/my%20file.txt"),
            Some(PathBuf::from("/srv/dist/my file.txt"))
        );
        assert_eq!(
            resolve(out, "/caf%C3%A9.txt"),
            Some(PathBuf::from("/srv/dist/café.txt"))
        );
    }

    #[test]
    fn test_resolve_rejects_encoded_parent() {
        let out = Path::new("/srv/dist");
        assert_eq!(resolve(out, "/%2e%2e/secret"), None);
        assert_eq!(resolve(out, "/a/%2E%2E%2F%2E%2E/etc/passwd"), None);
        assert_eq!(resolve(out, "/%ff.txt"), None);
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(Path::new("a.js")), "application/javascript");
        assert_eq!(content_type(Path::new("index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("logo.svg")), "image/svg+xml");
        assert_eq!(content_type(Path::new("blob")), "application/octet-stream");
    }
}
