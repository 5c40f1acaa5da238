//! API client for the ducks REST API.
//!
//! This module provides the `ApiClient` struct, the `reqwest` backed
//! implementation of `AuthApi`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{AuthorizeRequest, AuthorizeResponse, RegisterRequest, User};

use super::{ApiError, AuthApi};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const REGISTER_PATH: &str = "/auth/local/register";
const AUTHORIZE_PATH: &str = "/auth/local";
const USER_INFO_PATH: &str = "/users/me";

/// API client for the ducks service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(
        response: reqwest::Response,
        url: &str,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn register(&self, username: &str, password: &str, email: &str) -> Result<(), ApiError> {
        let url = self.url(REGISTER_PATH);
        debug!(url = %url, username, "Sending registration request");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&RegisterRequest {
                username,
                password,
                email,
            })
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }

    async fn authorize(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthorizeResponse, ApiError> {
        let url = self.url(AUTHORIZE_PATH);
        debug!(url = %url, username, "Sending authorization request");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&AuthorizeRequest {
                identifier: username,
                password,
            })
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response, &url).await
    }

    async fn fetch_user_info(&self, token: &str) -> Result<User, ApiError> {
        let url = self.url(USER_INFO_PATH);
        debug!(url = %url, "Fetching user info");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(token)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response, &url).await
    }
}

// ============================================================================
// Tests
// ============================================================================
