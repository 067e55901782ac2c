use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::middleware::SessionUser;
use crate::modules::catalog::models::{NewProduct, NewService, ProductPatch};
use crate::modules::catalog::services::CatalogService;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/products
pub async fn list_products(
    service: web::Data<Arc<CatalogService>>,
    _session: SessionUser,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.list_products().await?))
}

/// GET /api/products/search?q=
pub async fn search_products(
    service: web::Data<Arc<CatalogService>>,
    _session: SessionUser,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.search_products(&query.q).await?))
}

/// POST /api/products
pub async fn create_product(
    service: web::Data<Arc<CatalogService>>,
    _session: SessionUser,
    request: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
    let product = service.add_product(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(product))
}

/// GET /api/products/{id}
pub async fn get_product(
    service: web::Data<Arc<CatalogService>>,
    _session: SessionUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.get_product(path.into_inner()).await?))
}

/// PUT /api/products/{id}
pub async fn update_product(
    service: web::Data<Arc<CatalogService>>,
    _session: SessionUser,
    path: web::Path<i64>,
    request: web::Json<ProductPatch>,
) -> Result<HttpResponse, AppError> {
    let product = service
        .update_product(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(product))
}

/// DELETE /api/products/{id}
pub async fn delete_product(
    service: web::Data<Arc<CatalogService>>,
    _session: SessionUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    service.delete_product(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/services
pub async fn list_services(
    service: web::Data<Arc<CatalogService>>,
    _session: SessionUser,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.list_services().await?))
}

/// POST /api/services
pub async fn create_service(
    service: web::Data<Arc<CatalogService>>,
    _session: SessionUser,
    request: web::Json<NewService>,
) -> Result<HttpResponse, AppError> {
    let created = service.add_service(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// DELETE /api/services/{name}
pub async fn delete_service(
    service: web::Data<Arc<CatalogService>>,
    _session: SessionUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_service(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(list_products))
            .route("", web::post().to(create_product))
            .route("/search", web::get().to(search_products))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product))
            .route("/{id}", web::delete().to(delete_product)),
    )
    .service(
        web::scope("/services")
            .route("", web::get().to(list_services))
            .route("", web::post().to(create_service))
            .route("/{name}", web::delete().to(delete_service)),
    );
}
