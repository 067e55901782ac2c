use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::core::{AppError, Currency, Result};
use crate::modules::sales::models::{CreatedSale, NewSale};
use crate::modules::sales::repositories::SaleRepository;
use crate::modules::users::repositories::UserRepository;

/// Registers service sales for employees
pub struct SaleService {
    users: Arc<dyn UserRepository>,
    sales: Arc<dyn SaleRepository>,
    currency: Currency,
}

impl SaleService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sales: Arc<dyn SaleRepository>,
        currency: Currency,
    ) -> Self {
        Self {
            users,
            sales,
            currency,
        }
    }

    /// Validate, compute totals and persist the sale with its items
    pub async fn register(&self, request: NewSale) -> Result<CreatedSale> {
        if self.users.find_by_id(request.employee_id).await?.is_none() {
            return Err(AppError::validation(format!(
                "Unknown employee: {}",
                request.employee_id
            )));
        }

        let draft = request.into_draft(Utc::now(), self.currency)?;
        let created = self.sales.create_sale(&draft).await?;

        info!(
            sale_code = %created.sale.sale_code,
            employee_id = %created.sale.employee_id,
            total = %created.sale.total_amount,
            items = created.items.len(),
            "sale registered"
        );

        Ok(created)
    }
}
