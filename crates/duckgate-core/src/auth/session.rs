use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::User;

/// The client's view of who is signed in.
///
/// Token and user are set together or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    pub fn authenticated(token: String, user: User) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Get the bearer token if signed in
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

/// Shared handle to the session.
/// Clone is cheap; every clone sees the same session.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Session>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Session {
        self.inner.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_authenticated()
    }

    pub async fn user(&self) -> Option<User> {
        self.inner.read().await.user.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.token.clone()
    }

    /// Replace the whole session in one write
    pub(crate) async fn establish(&self, token: String, user: User) {
        *self.inner.write().await = Session::authenticated(token, user);
    }

    pub(crate) async fn clear(&self) {
        *self.inner.write().await = Session::default();
    }

    /// Hold the write lock so flows block on their session write
    #[cfg(test)]
    pub(crate) async fn hold_write(&self) -> tokio::sync::RwLockWriteGuard<'_, Session> {
        self.inner.write().await
    }
}
