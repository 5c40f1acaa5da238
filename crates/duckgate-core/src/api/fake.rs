//! In-process `AuthApi` double that records every call.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::models::{AuthorizeResponse, User};

use super::{ApiError, AuthApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Register {
        username: String,
        password: String,
        email: String,
    },
    Authorize {
        identifier: String,
        password: String,
    },
    FetchUserInfo {
        token: String,
    },
}

/// Canned reply for one endpoint
#[derive(Debug, Clone)]
pub(crate) enum Reply<T> {
    Ok(T),
    Status(u16),
    /// Never resolves; used to exercise cancellation
    Hang,
}

impl<T: Clone> Reply<T> {
    async fn resolve(&self) -> Result<T, ApiError> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Status(code) => {
                let status = StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                Err(ApiError::from_status(status, "fake"))
            }
            Reply::Hang => std::future::pending().await,
        }
    }
}

pub(crate) struct FakeApi {
    pub register: Reply<()>,
    pub authorize: Reply<AuthorizeResponse>,
    pub user_info: Reply<User>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    /// A server that accepts alice/secret and token "abc"
    pub fn new() -> Self {
        Self {
            register: Reply::Ok(()),
            authorize: Reply::Ok(AuthorizeResponse {
                jwt: Some("abc".to_string()),
                user: Some(User::new("alice", "a@x.com")),
            }),
            user_info: Reply::Ok(User::new("alice", "a@x.com")),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn register(&self, username: &str, password: &str, email: &str) -> Result<(), ApiError> {
        self.record(Call::Register {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
        });
        self.register.resolve().await
    }

    async fn authorize(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthorizeResponse, ApiError> {
        self.record(Call::Authorize {
            identifier: username.to_string(),
            password: password.to_string(),
        });
        self.authorize.resolve().await
    }

    async fn fetch_user_info(&self, token: &str) -> Result<User, ApiError> {
        self.record(Call::FetchUserInfo {
            token: token.to_string(),
        });
        self.user_info.resolve().await
    }
}
