use std::sync::Arc;

use tracing::{debug, error, info};

use crate::api::AuthApi;
use crate::routes::Route;

use super::AuthError;

/// Result of a successful registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterOutcome {
    /// New accounts still have to sign in
    pub destination: Route,
}

/// Account creation against the registration endpoint.
#[derive(Clone)]
pub struct Registration {
    api: Arc<dyn AuthApi>,
}

impl Registration {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self { api }
    }

    /// Register a new account. Nothing is sent unless both passwords match.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<RegisterOutcome, AuthError> {
        if password != confirm_password {
            debug!(username, "Registration skipped: passwords do not match");
            return Err(AuthError::PasswordMismatch);
        }

        if let Err(e) = self.api.register(username, password, email).await {
            error!(error = %e, username, "Registration failed");
            return Err(e.into());
        }

        info!(username, "Registration successful");
        Ok(RegisterOutcome {
            destination: Route::Login,
        })
    }
}
