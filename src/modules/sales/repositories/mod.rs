pub mod product_sale_repository;
pub mod sale_repository;

pub use product_sale_repository::{PgProductSaleRepository, ProductSaleRepository};
pub use sale_repository::{PgSaleRepository, SaleRepository, SummaryProcedureArgs};
