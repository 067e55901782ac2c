use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// Entry on the salon's service menu (cut, dye, manicure...)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalonService {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewService {
    pub name: String,
}

impl NewService {
    /// Trimmed service name, rejecting blanks
    pub fn normalized_name(&self) -> Result<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Service name is required"));
        }
        Ok(name.to_string())
    }
}
