use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Currency, Result};

/// Share of an item's amount credited as earnings when the caller sends none
const DEFAULT_EARNINGS_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// How the customer paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    /// Bank transfer; older clients send `transaction`
    #[serde(alias = "transaction")]
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        match s.as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "transfer" | "transaction" => Ok(PaymentMethod::Transfer),
            other => Err(format!("Invalid payment method: {}", other)),
        }
    }
}

/// Registered sale; immutable once written
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: i64,
    pub sale_code: String,
    #[sqlx(try_from = "String")]
    pub payment_method: PaymentMethod,
    pub total_amount: Decimal,
    pub earnings_amount: Decimal,
    pub employee_id: Uuid,
    pub sale_date: DateTime<Utc>,
}

/// Line of a sale: one service performed `quantity` times
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    pub service_name: String,
    pub unit_cost: Decimal,
    pub quantity: i32,
    pub employee_earnings: Decimal,
}

/// Body of the sale registration endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub employee_id: Uuid,
    pub payment_method: PaymentMethod,
    pub items: Vec<NewSaleItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSaleItem {
    pub service_name: String,
    pub unit_cost: Decimal,
    pub quantity: i32,
    #[serde(default)]
    pub employee_earnings: Option<Decimal>,
}

/// Validated sale ready to persist, totals already computed
#[derive(Debug, Clone, PartialEq)]
pub struct SaleDraft {
    pub sale_code: String,
    pub payment_method: PaymentMethod,
    pub employee_id: Uuid,
    pub total_amount: Decimal,
    pub earnings_amount: Decimal,
    pub sale_date: DateTime<Utc>,
    pub items: Vec<SaleItemDraft>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleItemDraft {
    pub service_name: String,
    pub unit_cost: Decimal,
    pub quantity: i32,
    pub employee_earnings: Decimal,
}

impl NewSale {
    /// Validate the lines and compute totals
    ///
    /// `total_amount` is Σ unit_cost × quantity and `earnings_amount` is Σ
    /// item earnings; an item without explicit earnings gets half its amount.
    pub fn into_draft(self, now: DateTime<Utc>, currency: Currency) -> Result<SaleDraft> {
        if self.items.is_empty() {
            return Err(AppError::validation("A sale needs at least one item"));
        }

        let mut items = Vec::with_capacity(self.items.len());
        for (idx, item) in self.items.into_iter().enumerate() {
            let line = idx + 1;
            let service_name = item.service_name.trim().to_string();
            if service_name.is_empty() {
                return Err(AppError::validation(format!(
                    "Item {}: serviceName is required",
                    line
                )));
            }
            if item.quantity <= 0 {
                return Err(AppError::validation(format!(
                    "Item {}: quantity must be positive",
                    line
                )));
            }
            currency
                .validate_amount(item.unit_cost)
                .map_err(|e| AppError::validation(format!("Item {}: {}", line, e)))?;

            let amount = item.unit_cost * Decimal::from(item.quantity);
            let employee_earnings = match item.employee_earnings {
                Some(earnings) => {
                    currency
                        .validate_amount(earnings)
                        .map_err(|e| AppError::validation(format!("Item {}: {}", line, e)))?;
                    earnings
                }
                None => currency.round(amount * DEFAULT_EARNINGS_RATE),
            };
            if employee_earnings > amount {
                return Err(AppError::validation(format!(
                    "Item {}: earnings cannot exceed the item amount",
                    line
                )));
            }

            items.push(SaleItemDraft {
                service_name,
                unit_cost: item.unit_cost,
                quantity: item.quantity,
                employee_earnings,
            });
        }

        let total_amount: Decimal = items
            .iter()
            .map(|i| i.unit_cost * Decimal::from(i.quantity))
            .sum();
        let earnings_amount: Decimal = items.iter().map(|i| i.employee_earnings).sum();

        Ok(SaleDraft {
            sale_code: sale_code(now),
            payment_method: self.payment_method,
            employee_id: self.employee_id,
            total_amount,
            earnings_amount,
            sale_date: now,
            items,
        })
    }
}

/// `SALE-<unix millis>-<8 hex>`; the suffix keeps same-millisecond sales apart
fn sale_code(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("SALE-{}-{}", now.timestamp_millis(), &suffix[..8])
}

/// A persisted sale with its lines
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSale {
    pub sale: SaleRecord,
    pub items: Vec<SaleItem>,
}
