use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// Product-sale ledger row; stock is decremented when it is written
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSale {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductSale {
    pub product_id: i64,
    pub quantity: i32,
}

impl NewProductSale {
    pub fn validate(&self) -> Result<()> {
        if self.quantity <= 0 {
            return Err(AppError::validation("quantity must be positive"));
        }
        Ok(())
    }
}
