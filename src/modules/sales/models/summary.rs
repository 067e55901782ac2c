use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::sale::{SaleItem, SaleRecord};

/// Sale record with its line items attached
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub record: SaleRecord,
    pub items: Vec<SaleItem>,
}

/// Per-employee totals over a date window
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSalesSummary {
    pub employee_id: Uuid,
    pub name: String,
    /// Σ total_amount
    pub total: Decimal,
    /// Σ earnings_amount
    pub earned: Decimal,
    pub sales_records: Vec<SaleWithItems>,
}
