// Catalog module: retail products and the salon's service menu

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Product, SalonService};
pub use repositories::{ProductRepository, ServiceRepository};
pub use services::CatalogService;
