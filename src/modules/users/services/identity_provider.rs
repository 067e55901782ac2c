use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::config::PlatformConfig;
use crate::core::{AppError, Result};

/// Authentication identities held by the hosted Auth service
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a confirmed email/password identity and return its id
    async fn create_identity(&self, email: &str, password: &str) -> Result<Uuid>;

    async fn update_email(&self, id: Uuid, email: &str) -> Result<()>;

    async fn delete_identity(&self, id: Uuid) -> Result<()>;
}

/// Auth admin API client authenticated with the service-role key
pub struct SupabaseIdentityProvider {
    client: Client,
    base_url: String,
    service_role_key: String,
}

impl SupabaseIdentityProvider {
    pub fn new(config: &PlatformConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            service_role_key: config.service_role_key.clone(),
        })
    }

    fn admin_url(&self, suffix: &str) -> String {
        format!("{}/auth/v1/admin/users{}", self.base_url, suffix)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    async fn ensure_success(response: Response, action: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<AuthErrorBody>(&body)
            .ok()
            .and_then(AuthErrorBody::message)
            .unwrap_or(body);

        Err(AppError::upstream(format!(
            "Auth API failed to {} ({}): {}",
            action, status, message
        )))
    }
}

#[derive(Serialize)]
struct CreateIdentityBody<'a> {
    email: &'a str,
    password: &'a str,
    email_confirm: bool,
}

#[derive(Serialize)]
struct UpdateIdentityBody<'a> {
    email: &'a str,
}

#[derive(Deserialize)]
struct IdentityResponse {
    id: Uuid,
}

#[derive(Deserialize)]
struct AuthErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
}

impl AuthErrorBody {
    fn message(self) -> Option<String> {
        self.msg.or(self.message).or(self.error_description)
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn create_identity(&self, email: &str, password: &str) -> Result<Uuid> {
        let response = self
            .authorized(self.client.post(self.admin_url("")))
            .json(&CreateIdentityBody {
                email,
                password,
                email_confirm: true,
            })
            .send()
            .await?;

        let response = Self::ensure_success(response, "create user").await?;
        let identity: IdentityResponse = response
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("Auth API returned no user id: {}", e)))?;

        Ok(identity.id)
    }

    async fn update_email(&self, id: Uuid, email: &str) -> Result<()> {
        let response = self
            .authorized(self.client.put(self.admin_url(&format!("/{}", id))))
            .json(&UpdateIdentityBody { email })
            .send()
            .await?;

        Self::ensure_success(response, "update user").await?;
        Ok(())
    }

    async fn delete_identity(&self, id: Uuid) -> Result<()> {
        let response = self
            .authorized(self.client.delete(self.admin_url(&format!("/{}", id))))
            .send()
            .await?;

        Self::ensure_success(response, "delete user").await?;
        Ok(())
    }
}
