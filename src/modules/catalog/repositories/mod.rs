pub mod product_repository;
pub mod service_repository;

pub use product_repository::{PgProductRepository, ProductRepository};
pub use service_repository::{PgServiceRepository, ServiceRepository};
