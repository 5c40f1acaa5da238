use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::api::{ApiError, AuthApi};
use crate::models::User;
use crate::routes::{post_login_destination, Route};

use super::{AuthError, SessionContext, TokenStore};

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: User,
    /// Where to send the user next
    pub destination: Route,
}

/// Owns every write to the session: startup restore, login and logout.
#[derive(Clone)]
pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    tokens: Arc<dyn TokenStore>,
    session: SessionContext,
}

impl SessionStore {
    pub fn new(api: Arc<dyn AuthApi>, tokens: Arc<dyn TokenStore>, session: SessionContext) -> Self {
        Self {
            api,
            tokens,
            session,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Restore the session from the persisted token.
    ///
    /// The token is only trusted once the profile fetch succeeds. Returns
    /// whether the session is now authenticated; failures are logged.
    pub async fn initialize(&self) -> bool {
        let token = match self.tokens.get() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!(backend = self.tokens.backend_name(), "No persisted token");
                return false;
            }
            Err(e) => {
                error!(error = %e, backend = self.tokens.backend_name(), "Failed to read persisted token");
                return false;
            }
        };

        match self.api.fetch_user_info(&token).await {
            Ok(user) => {
                info!(username = %user.username, "Session restored");
                self.session.establish(token, user).await;
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to restore session from persisted token");
                false
            }
        }
    }

    /// Sign in with `username` and `password`.
    ///
    /// `intent` is the navigation intent captured when the user was sent to
    /// the login view; it decides the returned destination.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        intent: Option<Route>,
    ) -> Result<LoginOutcome, AuthError> {
        if username.is_empty() || password.is_empty() {
            debug!("Login skipped: username and password required");
            return Err(AuthError::MissingCredentials);
        }

        let response = match self.api.authorize(username, password).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, username, "Login failed");
                return Err(e.into());
            }
        };

        let Some(token) = response.token().map(str::to_string) else {
            error!(username, "Login response did not include a token");
            return Err(ApiError::MissingToken.into());
        };

        let user = response.user.unwrap_or_else(|| {
            warn!(username, "Login response did not include a user, using entered username");
            User::new(username, "")
        });

        // Last await in the flow; persisting below does not yield
        self.session.establish(token.clone(), user.clone()).await;
        if let Err(e) = self.tokens.set(&token) {
            warn!(error = %e, backend = self.tokens.backend_name(), "Failed to persist token");
        }

        let destination = post_login_destination(intent);
        info!(username = %user.username, destination = %destination, "Login successful");
        Ok(LoginOutcome { user, destination })
    }

    /// Forget the token everywhere and reset the session
    pub async fn logout(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, backend = self.tokens.backend_name(), "Failed to clear persisted token");
        }
        self.session.clear().await;
        info!("Logged out");
    }
}

// ============================================================================
// Tests
// ============================================================================
