use atrium_core::{AppError, DigestError};
use atrium_db::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("tenant_id is required")]
    MissingTenant,

    #[error("Missing authorization token")]
    MissingToken,

    #[error("Invalid token")]
    TokenNotFound,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied. Required role: {required}")]
    Forbidden { required: String },

    #[error("Token validation unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Digest(#[from] DigestError),
}

impl AuthError {
    /// True for failures that mean "this caller is not authenticated".
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::MissingToken | Self::TokenNotFound | Self::Expired | Self::InvalidCredentials
        )
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingTenant => AppError::bad_request(err),
            AuthError::MissingToken
            | AuthError::TokenNotFound
            | AuthError::Expired
            | AuthError::InvalidCredentials => AppError::unauthorized(err),
            AuthError::Forbidden { .. } => AppError::forbidden(err),
            AuthError::Unavailable(_) => AppError::unavailable(err),
            AuthError::Store(store) => store.into(),
            AuthError::Digest(digest) => digest.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let status = |err: AuthError| AppError::from(err).status.as_u16();
        assert_eq!(status(AuthError::MissingTenant), 400);
        assert_eq!(status(AuthError::MissingToken), 401);
        assert_eq!(status(AuthError::TokenNotFound), 401);
        assert_eq!(status(AuthError::Expired), 401);
        assert_eq!(status(AuthError::InvalidCredentials), 401);
        assert_eq!(
            status(AuthError::Forbidden {
                required: "admin".into()
            }),
            403
        );
        assert_eq!(status(AuthError::Unavailable("timeout".into())), 503);
    }

    #[test]
    fn test_forbidden_message_names_roles() {
        let err = AppError::from(AuthError::Forbidden {
            required: "admin".into(),
        });
        assert_eq!(err.body()["error"], "Access denied. Required role: admin");
    }
}
