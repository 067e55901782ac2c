use std::sync::Arc;

use tracing::info;

use crate::core::{AppError, Currency, Result};
use crate::modules::catalog::models::{NewProduct, NewService, Product, ProductPatch, SalonService};
use crate::modules::catalog::repositories::{ProductRepository, ServiceRepository};

/// Product inventory and service menu maintenance
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
    services: Arc<dyn ServiceRepository>,
    currency: Currency,
}

impl CatalogService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        services: Arc<dyn ServiceRepository>,
        currency: Currency,
    ) -> Self {
        Self {
            products,
            services,
            currency,
        }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.products.list().await
    }

    /// Blank queries return the full list
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>> {
        if query.trim().is_empty() {
            return self.products.list().await;
        }
        self.products.search(query).await
    }

    pub async fn get_product(&self, id: i64) -> Result<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {}", id)))
    }

    pub async fn add_product(&self, product: NewProduct) -> Result<Product> {
        product.validate(self.currency)?;
        let created = self.products.insert(&product).await?;
        info!(product_id = created.id, name = %created.name, "product added");
        Ok(created)
    }

    pub async fn update_product(&self, id: i64, patch: ProductPatch) -> Result<Product> {
        patch.validate(self.currency)?;
        self.products
            .update(id, &patch)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {}", id)))
    }

    pub async fn delete_product(&self, id: i64) -> Result<()> {
        if !self.products.delete(id).await? {
            return Err(AppError::not_found(format!("Product {}", id)));
        }
        info!(product_id = id, "product deleted");
        Ok(())
    }

    pub async fn list_services(&self) -> Result<Vec<SalonService>> {
        self.services.list().await
    }

    pub async fn add_service(&self, service: NewService) -> Result<SalonService> {
        let name = service.normalized_name()?;
        match self.services.insert(&name).await {
            Ok(created) => {
                info!(name = %created.name, "service added");
                Ok(created)
            }
            Err(AppError::Database(sqlx::Error::Database(db))) if db.is_unique_violation() => Err(
                AppError::validation(format!("Service '{}' already exists", name)),
            ),
            Err(e) => Err(e),
        }
    }

    pub async fn delete_service(&self, name: &str) -> Result<()> {
        if !self.services.delete_by_name(name.trim()).await? {
            return Err(AppError::not_found(format!("Service '{}'", name)));
        }
        info!(name = %name, "service deleted");
        Ok(())
    }
}
