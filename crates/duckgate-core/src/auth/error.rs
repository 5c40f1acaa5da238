use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Username and password required")]
    MissingCredentials,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Validation failures are rejected before any request is sent
    pub fn is_validation(&self) -> bool {
        matches!(self, AuthError::MissingCredentials | AuthError::PasswordMismatch)
    }
}
