use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Currency, Result};

/// Retail product kept in stock
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount_percent: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount_percent: Option<Decimal>,
}

impl NewProduct {
    pub fn validate(&self, currency: Currency) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Product name is required"));
        }
        validate_stock(self.quantity)?;
        validate_price(self.unit_price, currency)?;
        validate_discount(self.discount_percent)
    }
}

/// Partial product update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub discount_percent: Option<Decimal>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.unit_price.is_none()
            && self.discount_percent.is_none()
    }

    pub fn validate(&self, currency: Currency) -> Result<()> {
        if self.is_empty() {
            return Err(AppError::validation("Nothing to update"));
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Product name cannot be empty"));
            }
        }
        if let Some(quantity) = self.quantity {
            validate_stock(quantity)?;
        }
        if let Some(price) = self.unit_price {
            validate_price(price, currency)?;
        }
        validate_discount(self.discount_percent)
    }
}

fn validate_stock(quantity: i32) -> Result<()> {
    if quantity < 0 {
        return Err(AppError::validation("Quantity cannot be negative"));
    }
    Ok(())
}

fn validate_price(price: Decimal, currency: Currency) -> Result<()> {
    currency
        .validate_amount(price)
        .map_err(AppError::validation)
}

fn validate_discount(discount: Option<Decimal>) -> Result<()> {
    match discount {
        Some(pct) if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED => Err(
            AppError::validation("Discount must be between 0 and 100 percent"),
        ),
        _ => Ok(()),
    }
}
