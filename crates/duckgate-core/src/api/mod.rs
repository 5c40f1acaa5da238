//! Collaborators for the remote ducks API.
//!
//! The `AuthApi` trait is the fixed contract the auth flows depend on;
//! `ApiClient` is its `reqwest` implementation. Tests substitute fakes.

pub mod client;
pub mod error;
#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::models::{AuthorizeResponse, User};

pub use client::ApiClient;
pub use error::ApiError;

/// Registration, login and profile endpoints of the remote API.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Create an account. Success carries no payload.
    async fn register(&self, username: &str, password: &str, email: &str) -> Result<(), ApiError>;

    /// Exchange credentials for a token.
    /// The username is sent to the server as `identifier`.
    async fn authorize(&self, username: &str, password: &str)
        -> Result<AuthorizeResponse, ApiError>;

    /// Fetch the profile belonging to `token`.
    async fn fetch_user_info(&self, token: &str) -> Result<User, ApiError>;
}
