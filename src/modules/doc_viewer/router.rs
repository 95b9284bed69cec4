use axum::{Router, routing::get};

use super::controller::{doc_file, doc_index};
use crate::state::AppState;

pub fn init_doc_viewer_router() -> Router<AppState> {
    Router::new()
        .route("/", get(doc_index))
        .route("/{*path}", get(doc_file))
}
