use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::Result;
use crate::modules::media::models::{MediaItem, MediaPatch, NewMediaItem};

#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Every item, grouped by section and ordered within it
    async fn list(&self) -> Result<Vec<MediaItem>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MediaItem>>;

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<MediaItem>>;

    async fn insert(&self, item: &NewMediaItem) -> Result<MediaItem>;

    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Apply every patch in one transaction
    async fn apply_patches(&self, patches: &[(Uuid, MediaPatch)]) -> Result<Vec<MediaItem>>;
}

const MEDIA_COLUMNS: &str =
    "id, name, url, mime_type, section, sort_order, position, storage_path, owner, created_at";

pub struct PgMediaRepository {
    pool: PgPool,
}

impl PgMediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaRepository for PgMediaRepository {
    async fn list(&self) -> Result<Vec<MediaItem>> {
        let items = sqlx::query_as::<_, MediaItem>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media_items ORDER BY section NULLS FIRST, sort_order ASC, created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MediaItem>> {
        let item = sqlx::query_as::<_, MediaItem>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<MediaItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = sqlx::query_as::<_, MediaItem>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media_items WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn insert(&self, item: &NewMediaItem) -> Result<MediaItem> {
        let created = sqlx::query_as::<_, MediaItem>(&format!(
            r#"
            INSERT INTO media_items (name, url, mime_type, storage_path, owner)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MEDIA_COLUMNS}
            "#
        ))
        .bind(&item.name)
        .bind(&item.url)
        .bind(&item.mime_type)
        .bind(&item.storage_path)
        .bind(item.owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM media_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn apply_patches(&self, patches: &[(Uuid, MediaPatch)]) -> Result<Vec<MediaItem>> {
        let mut tx = self.pool.begin().await?;
        let mut updated = Vec::with_capacity(patches.len());

        for (id, patch) in patches {
            let item = sqlx::query_as::<_, MediaItem>(&format!(
                r#"
                UPDATE media_items
                SET section = $2, sort_order = $3, position = $4
                WHERE id = $1
                RETURNING {MEDIA_COLUMNS}
                "#
            ))
            .bind(id)
            .bind(patch.section.map(|s| s.as_str()))
            .bind(patch.order)
            .bind(patch.position.trim())
            .fetch_one(&mut *tx)
            .await?;
            updated.push(item);
        }

        tx.commit().await?;
        Ok(updated)
    }
}
