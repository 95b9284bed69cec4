use axum::extract::{Path, State};

use atrium_core::ResponseEnvelope;

use super::service::DocViewerService;
use crate::state::AppState;

/// Documentation index
#[utoipa::path(
    get,
    path = "/doc",
    responses(
        (status = 200, description = "index.html of the documentation root", content_type = "text/html"),
        (status = 404, description = "No index.html")
    ),
    tag = "Documentation"
)]
pub async fn doc_index(State(state): State<AppState>) -> ResponseEnvelope {
    DocViewerService::serve(&state.docs_config.root, "/doc").await
}

/// Documentation file
#[utoipa::path(
    get,
    path = "/doc/{path}",
    params(("path" = String, Path, description = "File path under the documentation root")),
    responses(
        (status = 200, description = "File content, Content-Type from the extension"),
        (status = 403, description = "Path escapes the documentation root"),
        (status = 404, description = "File not found")
    ),
    tag = "Documentation"
)]
pub async fn doc_file(State(state): State<AppState>, Path(path): Path<String>) -> ResponseEnvelope {
    let request_path = format!("/doc/{}", path);
    DocViewerService::serve(&state.docs_config.root, &request_path).await
}
