use atrium_core::AppError;
use atrium_db::StoreError;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("{target} request failed: {source}")]
    Transport {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{target} timed out")]
    Timeout { target: String },

    #[error("{target} responded with status {status}")]
    Status { target: String, status: u16 },

    #[error("{target} returned an invalid response: {reason}")]
    InvalidResponse { target: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CollaboratorError {
    pub(crate) fn from_reqwest(target: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                target: target.to_string(),
            }
        } else {
            Self::Transport {
                target: target.to_string(),
                source: err,
            }
        }
    }
}

impl From<CollaboratorError> for AppError {
    fn from(err: CollaboratorError) -> Self {
        match err {
            CollaboratorError::Store(store) => store.into(),
            CollaboratorError::Client(_) => AppError::internal(err),
            other => {
                warn!(error = %other, "Collaborator call failed");
                AppError::unavailable(other)
            }
        }
    }
}
