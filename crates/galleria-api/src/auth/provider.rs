//! Hosted auth backend client.
//!
//! Identity is validated per request against `GET /auth/v1/user`; the
//! registration gate enumerates users through the admin endpoint.

use async_trait::async_trait;
use galleria_core::AppError;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use super::models::Principal;

/// Identity validation seam, mocked in tests.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve a bearer token into the user it belongs to.
    async fn verify_token(&self, token: &str) -> Result<Principal, AppError>;

    /// Whether at least one account exists on the auth backend.
    async fn is_registered(&self) -> Result<bool, AppError>;
}

#[derive(Debug, Deserialize)]
struct UserList {
    #[serde(default)]
    users: Vec<serde_json::Value>,
}

/// [`AuthProvider`] backed by the hosted auth REST API
#[derive(Clone)]
pub struct HostedAuthProvider {
    client: Client,
    base_url: String,
    anon_key: String,
    service_role_key: Option<String>,
}

impl HostedAuthProvider {
    pub fn new(
        base_url: &str,
        anon_key: &str,
        service_role_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            service_role_key: service_role_key.map(str::to_string),
        })
    }
}

#[async_trait]
impl AuthProvider for HostedAuthProvider {
    #[tracing::instrument(skip(self, token))]
    async fn verify_token(&self, token: &str) -> Result<Principal, AppError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Auth backend unreachable: {}", e)))?;

        match response.status() {
            status if status.is_success() => response
                .json::<Principal>()
                .await
                .map_err(|e| AppError::Upstream(format!("Invalid auth backend response: {}", e))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::Unauthorized(
                "Invalid or expired access token".to_string(),
            )),
            status => Err(AppError::Upstream(format!(
                "Auth backend returned status {}",
                status
            ))),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn is_registered(&self) -> Result<bool, AppError> {
        let service_role_key = self.service_role_key.as_deref().ok_or_else(|| {
            AppError::Configuration("AUTH_SERVICE_ROLE_KEY is not set".to_string())
        })?;

        let response = self
            .client
            .get(format!("{}/auth/v1/admin/users", self.base_url))
            .query(&[("page", "1"), ("per_page", "1")])
            .header("apikey", service_role_key)
            .bearer_auth(service_role_key)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Auth backend unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Auth backend returned status {}",
                response.status()
            )));
        }

        let list: UserList = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid auth backend response: {}", e)))?;

        Ok(!list.users.is_empty())
    }
}
