use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::SessionUser;
use crate::modules::sales::models::{NewProductSale, NewSale};
use crate::modules::sales::services::{
    ProductSaleService, SaleService, SalesFilterRequest, SalesSummaryService,
};
use crate::modules::users::models::Role;
use crate::modules::users::services::UserService;

/// Summary computed by the database function, shaped like `GET /api/sales/summary`
/// POST /api/sales-summary
pub async fn procedure_summary(
    service: web::Data<Arc<SalesSummaryService>>,
    _session: SessionUser,
    request: web::Json<SalesFilterRequest>,
) -> Result<HttpResponse, AppError> {
    let data = service.summarize_in_database(&request).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "data": data })))
}

/// Summary aggregated in-process
/// GET /api/sales/summary
pub async fn sales_summary(
    service: web::Data<Arc<SalesSummaryService>>,
    _session: SessionUser,
    query: web::Query<SalesFilterRequest>,
) -> Result<HttpResponse, AppError> {
    let data = service.summarize(&query).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "data": data })))
}

/// Register a service sale (admins and cashiers)
/// POST /api/sales
pub async fn register_sale(
    sales: web::Data<Arc<SaleService>>,
    users: web::Data<Arc<UserService>>,
    session: SessionUser,
    request: web::Json<NewSale>,
) -> Result<HttpResponse, AppError> {
    users
        .require_role(session.0, |role: Role| role.can_register_sales())
        .await?;

    let created = sales.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Sell a retail product
/// POST /api/product-sales
pub async fn record_product_sale(
    service: web::Data<Arc<ProductSaleService>>,
    _session: SessionUser,
    request: web::Json<NewProductSale>,
) -> Result<HttpResponse, AppError> {
    let sale = service.record(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(sale))
}

/// Configure sales routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/sales-summary", web::post().to(procedure_summary))
        .route("/sales/summary", web::get().to(sales_summary))
        .route("/sales", web::post().to(register_sale))
        .route("/product-sales", web::post().to(record_product_sale));
}
