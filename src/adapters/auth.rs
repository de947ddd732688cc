use crate::domain::model::AdminUser;
use crate::domain::ports::Authenticator;
use crate::utils::error::{ContentError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Validates admin session tokens against the Supabase auth `/auth/v1/user` endpoint.
#[derive(Clone)]
pub struct SupabaseAuth {
    base_url: String,
    anon_key: String,
    client: Client,
}

impl SupabaseAuth {
    pub fn new(base_url: &str, anon_key: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            client,
        })
    }
}

#[async_trait]
impl Authenticator for SupabaseAuth {
    async fn current_user(&self, access_token: &str) -> Result<Option<AdminUser>> {
        if access_token.trim().is_empty() {
            return Ok(None);
        }

        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let user: UserResponse = response.json().await?;
                Ok(Some(AdminUser {
                    id: user.id,
                    email: user.email,
                }))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::debug!("Session token rejected by auth endpoint");
                Ok(None)
            }
            status => Err(ContentError::QueryError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }
}
