use atrium_core::{RequestEnvelope, ResponseEnvelope};

use super::service::DocViewerService;
use crate::state::AppState;

/// Serves `request.path` (for example `/doc/index.html`).
pub async fn view_doc(state: &AppState, request: &RequestEnvelope) -> ResponseEnvelope {
    let path = if request.path.is_empty() {
        "/doc"
    } else {
        request.path.as_str()
    };
    DocViewerService::serve(&state.docs_config.root, path).await
}
