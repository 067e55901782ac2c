use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};

const DEFAULT_POSITION: &str = "center";
const MAX_POSITION_LEN: usize = 64;

/// Site section a media item can be placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaSection {
    Inicio,
    Nosotros,
    Ofertas,
}

impl MediaSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaSection::Inicio => "inicio",
            MediaSection::Nosotros => "nosotros",
            MediaSection::Ofertas => "ofertas",
        }
    }
}

/// Uploaded file with its placement on the site
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub mime_type: String,
    /// `None` while unassigned
    pub section: Option<String>,
    pub sort_order: i32,
    /// CSS `object-position` hint
    pub position: String,
    pub storage_path: Option<String>,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Row written after the object has been stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewMediaItem {
    pub name: String,
    pub url: String,
    pub mime_type: String,
    pub storage_path: String,
    pub owner: Uuid,
}

/// Placement of one item after a staged edit
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPatch {
    #[serde(default)]
    pub section: Option<MediaSection>,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_position")]
    pub position: String,
}

fn default_position() -> String {
    DEFAULT_POSITION.to_string()
}

impl MediaPatch {
    pub fn validate(&self) -> Result<()> {
        if self.order < 0 {
            return Err(AppError::validation("order cannot be negative"));
        }
        let position = self.position.trim();
        if position.is_empty() || position.len() > MAX_POSITION_LEN {
            return Err(AppError::validation(format!(
                "position must be 1 to {} characters",
                MAX_POSITION_LEN
            )));
        }
        Ok(())
    }
}

/// Pending placement edits keyed by item id, applied together on commit
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaChangeSet {
    pub changes: BTreeMap<Uuid, MediaPatch>,
}

impl MediaChangeSet {
    pub fn stage(&mut self, id: Uuid, patch: MediaPatch) {
        self.changes.insert(id, patch);
    }

    /// Drop a pending edit, e.g. after the item was deleted
    pub fn discard(&mut self, id: &Uuid) -> Option<MediaPatch> {
        self.changes.remove(id)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.changes.keys().copied().collect()
    }
}
