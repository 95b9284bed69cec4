use std::path::{Component, Path, PathBuf};

use axum::http::StatusCode;
use tokio::fs;
use tracing::{error, info, instrument, warn};

use atrium_core::ResponseEnvelope;

const DOC_PREFIX: &str = "/doc";
const INDEX: &str = "index.html";
const FALLBACK_MIME: &str = "application/octet-stream";

const MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("xml", "text/xml"),
    ("yaml", "text/yaml"),
    ("yml", "text/yaml"),
    ("js", "application/javascript"),
    ("mjs", "application/javascript"),
    ("json", "application/json"),
    ("map", "application/json"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("ico", "image/x-icon"),
    ("pdf", "application/pdf"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
];

/// MIME type from the file extension, `application/octet-stream` when unknown.
pub fn content_type_for(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .and_then(|ext| {
            MIME_TYPES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| *mime)
        })
        .unwrap_or(FALLBACK_MIME)
}

/// Served as text: `text/*`, JSON and JavaScript. Everything else is base64.
pub fn is_text(content_type: &str) -> bool {
    content_type.starts_with("text")
        || content_type == "application/json"
        || content_type == "application/javascript"
}

/// Joins the request path (without the `/doc` prefix) onto `root`.
/// `None` when `..` segments climb above the root.
pub fn resolve_relative(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path
        .strip_prefix(DOC_PREFIX)
        .unwrap_or(request_path);

    let mut resolved = root.to_path_buf();
    let mut depth = 0usize;
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(segment) => {
                resolved.push(segment);
                depth += 1;
            }
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                resolved.pop();
                depth -= 1;
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    Some(resolved)
}

fn cors(envelope: ResponseEnvelope) -> ResponseEnvelope {
    envelope
        .with_header("Access-Control-Allow-Origin", "*")
        .with_header("Access-Control-Allow-Headers", "*")
        .with_header("Access-Control-Allow-Methods", "GET,OPTIONS")
}

fn denied() -> ResponseEnvelope {
    cors(ResponseEnvelope::text(StatusCode::FORBIDDEN, "Access denied"))
}

fn missing(request_path: &str) -> ResponseEnvelope {
    cors(ResponseEnvelope::text(
        StatusCode::NOT_FOUND,
        format!("File not found: {}", request_path),
    ))
}

pub struct DocViewerService;

impl DocViewerService {
    /// Serves one file under `root`. Never fails: every outcome is an envelope
    /// carrying the CORS headers.
    #[instrument(skip(root), fields(docs.root = %root.display()))]
    pub async fn serve(root: &Path, request_path: &str) -> ResponseEnvelope {
        let Some(mut file_path) = resolve_relative(root, request_path) else {
            warn!("Path escapes the documentation root");
            return denied();
        };

        if fs::metadata(&file_path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
        {
            file_path.push(INDEX);
        }

        // Symlinks may still point outside the root.
        let (canonical_root, canonical_file) =
            match (fs::canonicalize(root).await, fs::canonicalize(&file_path).await) {
                (Ok(root), Ok(file)) => (root, file),
                _ => {
                    warn!(file = %file_path.display(), "Documentation file not found");
                    return missing(request_path);
                }
            };
        if !canonical_file.starts_with(&canonical_root) {
            warn!(file = %canonical_file.display(), "Path escapes the documentation root");
            return denied();
        }

        let content = match fs::read(&canonical_file).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return missing(request_path),
            Err(e) => {
                error!(file = %canonical_file.display(), error = %e, "Failed to read documentation file");
                return cors(ResponseEnvelope::text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                ));
            }
        };

        let content_type = content_type_for(&canonical_file);
        let binary = !is_text(content_type);
        info!(file = %canonical_file.display(), binary, "Served documentation file");

        let envelope = if binary {
            ResponseEnvelope::binary(StatusCode::OK, &content)
        } else {
            ResponseEnvelope::text(StatusCode::OK, String::from_utf8_lossy(&content))
        };
        cors(envelope).with_header("Content-Type", content_type)
    }
}
