use serde::{Deserialize, Serialize};

/// Profile of the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct User {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }
}

/// Body for `POST /auth/local/register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
}

/// Body for `POST /auth/local`.
/// The API expects the username under `identifier`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizeRequest<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
}

/// Response from `POST /auth/local`.
/// The server may answer 2xx without a `jwt`, so both fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeResponse {
    #[serde(default)]
    pub jwt: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthorizeResponse {
    /// The bearer token, if the response carries a usable one
    pub fn token(&self) -> Option<&str> {
        self.jwt.as_deref().filter(|t| !t.trim().is_empty())
    }
}
