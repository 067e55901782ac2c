use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::media::models::{MediaChangeSet, MediaItem, MediaPatch, NewMediaItem};
use crate::modules::media::repositories::MediaRepository;
use crate::modules::media::services::ObjectStorage;

/// Raw upload as received from the client
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub owner: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub body: Bytes,
}

impl MediaUpload {
    fn validate(&self) -> Result<()> {
        if self.file_name.trim().is_empty() {
            return Err(AppError::validation("A file name is required"));
        }
        if self.body.is_empty() {
            return Err(AppError::validation("The uploaded file is empty"));
        }
        if !(self.content_type.starts_with("image/") || self.content_type.starts_with("video/")) {
            return Err(AppError::validation(format!(
                "Unsupported media type: {}",
                self.content_type
            )));
        }
        Ok(())
    }

    /// `<owner>/<unix millis>_<file name>` with unsafe characters replaced
    fn storage_path(&self) -> String {
        let safe: String = self
            .file_name
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}/{}_{}", self.owner, Utc::now().timestamp_millis(), safe)
    }
}

/// Media library backed by object storage plus a metadata table
pub struct MediaService {
    repo: Arc<dyn MediaRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl MediaService {
    pub fn new(repo: Arc<dyn MediaRepository>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { repo, storage }
    }

    pub async fn list(&self) -> Result<Vec<MediaItem>> {
        self.repo.list().await
    }

    /// Store the object, then its row; the object is removed if the row fails
    pub async fn upload(&self, upload: MediaUpload) -> Result<MediaItem> {
        upload.validate()?;

        let path = upload.storage_path();
        self.storage
            .upload(&path, &upload.content_type, upload.body.clone())
            .await?;

        let new_item = NewMediaItem {
            name: upload.file_name.trim().to_string(),
            url: self.storage.public_url(&path),
            mime_type: upload.content_type.clone(),
            storage_path: path.clone(),
            owner: upload.owner,
        };

        match self.repo.insert(&new_item).await {
            Ok(item) => {
                info!(media_id = %item.id, path = %path, "media uploaded");
                Ok(item)
            }
            Err(insert_err) => {
                error!(path = %path, error = %insert_err, "media row insert failed, removing object");
                if let Err(cleanup_err) = self.storage.remove(std::slice::from_ref(&path)).await {
                    warn!(path = %path, error = %cleanup_err, "could not remove orphaned object");
                }
                Err(insert_err)
            }
        }
    }

    /// Delete the row, then the stored object
    ///
    /// A failed object removal is logged; the item is gone from the library
    /// either way.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let item = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Media item {}", id)))?;

        self.repo.delete(id).await?;

        if let Some(path) = item.storage_path {
            if let Err(e) = self.storage.remove(std::slice::from_ref(&path)).await {
                warn!(media_id = %id, path = %path, error = %e, "could not remove stored object");
            }
        }

        info!(media_id = %id, "media deleted");
        Ok(())
    }

    /// Persist a batch of staged placement edits
    ///
    /// Every patch is validated and every item must exist and be uploaded
    /// before anything is written; the writes then happen in one transaction.
    pub async fn commit(&self, changes: MediaChangeSet) -> Result<Vec<MediaItem>> {
        if changes.is_empty() {
            return Ok(Vec::new());
        }

        for (id, patch) in &changes.changes {
            patch
                .validate()
                .map_err(|e| AppError::validation(format!("Media item {}: {}", id, e)))?;
        }

        let ids = changes.ids();
        let existing: HashMap<Uuid, MediaItem> = self
            .repo
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();

        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !existing.contains_key(*id))
            .map(Uuid::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::not_found(format!(
                "Media items {}",
                missing.join(", ")
            )));
        }

        if let Some(pending) = existing.values().find(|item| item.storage_path.is_none()) {
            return Err(AppError::validation(format!(
                "Media item {} has not finished uploading",
                pending.id
            )));
        }

        let patches: Vec<(Uuid, MediaPatch)> = changes.changes.into_iter().collect();
        let updated = self.repo.apply_patches(&patches).await?;

        info!(count = updated.len(), "media changes committed");
        Ok(updated)
    }
}
