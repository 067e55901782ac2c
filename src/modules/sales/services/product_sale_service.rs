use std::sync::Arc;

use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::catalog::repositories::ProductRepository;
use crate::modules::sales::models::{NewProductSale, ProductSale};
use crate::modules::sales::repositories::ProductSaleRepository;

/// Over-the-counter product sales
pub struct ProductSaleService {
    products: Arc<dyn ProductRepository>,
    product_sales: Arc<dyn ProductSaleRepository>,
}

impl ProductSaleService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        product_sales: Arc<dyn ProductSaleRepository>,
    ) -> Self {
        Self {
            products,
            product_sales,
        }
    }

    /// Record a sale; the database decrements stock and prices the row
    pub async fn record(&self, request: NewProductSale) -> Result<ProductSale> {
        request.validate()?;

        let product = self
            .products
            .find_by_id(request.product_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {}", request.product_id)))?;

        if product.quantity < request.quantity {
            return Err(AppError::validation(format!(
                "Only {} units of '{}' in stock",
                product.quantity, product.name
            )));
        }

        let sale = match self
            .product_sales
            .record(request.product_id, request.quantity)
            .await
        {
            Ok(sale) => sale,
            // Stock ran out between the check and the write
            Err(AppError::Database(sqlx::Error::Database(db))) if db.is_check_violation() => {
                return Err(AppError::validation(format!(
                    "Not enough stock of '{}'",
                    product.name
                )))
            }
            Err(e) => return Err(e),
        };

        info!(
            product_id = sale.product_id,
            quantity = sale.quantity,
            total = %sale.total,
            "product sale recorded"
        );

        Ok(sale)
    }
}
