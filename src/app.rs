use std::sync::Arc;

use actix_web::{error, web, HttpRequest};
use chrono_tz::Tz;
use sqlx::PgPool;

use crate::config::Config;
use crate::core::{AppError, Currency};
use crate::middleware::AuthSettings;
use crate::modules::catalog::repositories::{
    PgProductRepository, PgServiceRepository, ProductRepository, ServiceRepository,
};
use crate::modules::catalog::CatalogService;
use crate::modules::health::{DatabaseProbe, PgDatabaseProbe};
use crate::modules::loans::repositories::{LoanRepository, PgLoanRepository};
use crate::modules::loans::LoanService;
use crate::modules::media::repositories::{MediaRepository, PgMediaRepository};
use crate::modules::media::{MediaService, ObjectStorage};
use crate::modules::reports::CutReportService;
use crate::modules::sales::repositories::{
    PgProductSaleRepository, PgSaleRepository, ProductSaleRepository, SaleRepository,
};
use crate::modules::sales::{ProductSaleService, SaleService, SalesSummaryService};
use crate::modules::users::repositories::{PgUserRepository, UserRepository};
use crate::modules::users::{IdentityProvider, UserService};
use crate::modules::{catalog, health, loans, media, reports, sales, users};

/// Every repository the services are built from
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub services: Arc<dyn ServiceRepository>,
    pub sales: Arc<dyn SaleRepository>,
    pub product_sales: Arc<dyn ProductSaleRepository>,
    pub loans: Arc<dyn LoanRepository>,
    pub media: Arc<dyn MediaRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            products: Arc::new(PgProductRepository::new(pool.clone())),
            services: Arc::new(PgServiceRepository::new(pool.clone())),
            sales: Arc::new(PgSaleRepository::new(pool.clone())),
            product_sales: Arc::new(PgProductSaleRepository::new(pool.clone())),
            loans: Arc::new(PgLoanRepository::new(pool.clone())),
            media: Arc::new(PgMediaRepository::new(pool)),
        }
    }
}

/// Collaborators outside the database
#[derive(Clone)]
pub struct ExternalServices {
    pub identities: Arc<dyn IdentityProvider>,
    pub storage: Arc<dyn ObjectStorage>,
    pub database_probe: Arc<dyn DatabaseProbe>,
}

impl ExternalServices {
    pub fn new(
        identities: Arc<dyn IdentityProvider>,
        storage: Arc<dyn ObjectStorage>,
        pool: PgPool,
    ) -> Self {
        Self {
            identities,
            storage,
            database_probe: Arc::new(PgDatabaseProbe::new(pool)),
        }
    }
}

/// Settings the services read at construction time
#[derive(Clone)]
pub struct AppSettings {
    pub timezone: Tz,
    pub currency: Currency,
    pub auth: web::Data<AuthSettings>,
}

impl AppSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timezone: config.app.business_timezone,
            currency: config.app.report_currency,
            auth: web::Data::new(AuthSettings::new(
                &config.platform.jwt_secret,
                &config.platform.service_role_key,
            )),
        }
    }
}

/// Service graph shared by every worker
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub catalog: Arc<CatalogService>,
    pub sales: Arc<SaleService>,
    pub product_sales: Arc<ProductSaleService>,
    pub sales_summary: Arc<SalesSummaryService>,
    pub loans: Arc<LoanService>,
    pub reports: Arc<CutReportService>,
    pub media: Arc<MediaService>,
    database_probe: Arc<dyn DatabaseProbe>,
    auth: web::Data<AuthSettings>,
}

impl AppState {
    pub fn new(repos: Repositories, external: ExternalServices, settings: AppSettings) -> Self {
        Self {
            users: Arc::new(UserService::new(repos.users.clone(), external.identities)),
            catalog: Arc::new(CatalogService::new(
                repos.products.clone(),
                repos.services.clone(),
                settings.currency,
            )),
            sales: Arc::new(SaleService::new(
                repos.users.clone(),
                repos.sales.clone(),
                settings.currency,
            )),
            product_sales: Arc::new(ProductSaleService::new(
                repos.products.clone(),
                repos.product_sales.clone(),
            )),
            sales_summary: Arc::new(SalesSummaryService::new(
                repos.users.clone(),
                repos.sales.clone(),
                settings.timezone,
            )),
            loans: Arc::new(LoanService::new(
                repos.loans.clone(),
                repos.users.clone(),
                settings.timezone,
                settings.currency,
            )),
            reports: Arc::new(CutReportService::new(
                repos.users.clone(),
                repos.loans.clone(),
                repos.sales.clone(),
                repos.product_sales.clone(),
                repos.products.clone(),
                settings.currency,
            )),
            media: Arc::new(MediaService::new(repos.media.clone(), external.storage)),
            database_probe: external.database_probe,
            auth: settings.auth,
        }
    }

    /// Register shared data, extractor settings and every route
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.auth.clone())
            .app_data(web::Data::new(self.database_probe.clone()))
            .app_data(web::Data::new(self.users.clone()))
            .app_data(web::Data::new(self.catalog.clone()))
            .app_data(web::Data::new(self.sales.clone()))
            .app_data(web::Data::new(self.product_sales.clone()))
            .app_data(web::Data::new(self.sales_summary.clone()))
            .app_data(web::Data::new(self.loans.clone()))
            .app_data(web::Data::new(self.reports.clone()))
            .app_data(web::Data::new(self.media.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::QueryConfig::default().error_handler(query_error))
            .app_data(web::PathConfig::default().error_handler(path_error))
            .configure(health::configure)
            .service(
                web::scope("/api")
                    .configure(users::controllers::configure)
                    .configure(catalog::controllers::configure)
                    .configure(sales::controllers::configure)
                    .configure(loans::controllers::configure)
                    .configure(reports::controllers::configure)
                    .configure(media::controllers::configure),
            );
    }
}

// Extractor failures answer with the same `{ "error": ... }` body as handlers

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(format!("Invalid request body: {}", err)).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(format!("Invalid query string: {}", err)).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(format!("Invalid path: {}", err)).into()
}
