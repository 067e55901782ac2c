use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::config::PlatformConfig;
use crate::core::{AppError, Result};

/// Bucket of uploaded files
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store a new object; an existing path is an error
    async fn upload(&self, path: &str, content_type: &str, body: Bytes) -> Result<()>;

    async fn remove(&self, paths: &[String]) -> Result<()>;

    /// Public URL the site loads the object from
    fn public_url(&self, path: &str) -> String;
}

/// Storage API client for one bucket
pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    service_role_key: String,
    bucket: String,
}

#[derive(Serialize)]
struct RemoveBody<'a> {
    prefixes: &'a [String],
}

impl SupabaseStorage {
    pub fn new(config: &PlatformConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            service_role_key: config.service_role_key.clone(),
            bucket: config.media_bucket.clone(),
        })
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }

    async fn check(response: reqwest::Response, action: &str) -> Result<()> {
        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::upstream(format!(
            "Storage API failed to {} ({}): {}",
            action, status, body
        )))
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(&self, path: &str, content_type: &str, body: Bytes) -> Result<()> {
        let response = self
            .client
            .post(self.object_url(path))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::CACHE_CONTROL, "max-age=3600")
            .header("x-upsert", "false")
            .body(body)
            .send()
            .await?;

        Self::check(response, "upload object").await
    }

    async fn remove(&self, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .delete(format!("{}/storage/v1/object/{}", self.base_url, self.bucket))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(&RemoveBody { prefixes: paths })
            .send()
            .await?;

        Self::check(response, "remove objects").await
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}
