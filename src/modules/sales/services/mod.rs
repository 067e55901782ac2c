pub mod date_window;
pub mod product_sale_service;
pub mod sale_service;
pub mod sales_aggregator;
pub mod sales_summary_service;

pub use date_window::{DateWindow, FilterKind, SalesFilterRequest};
pub use product_sale_service::ProductSaleService;
pub use sale_service::SaleService;
pub use sales_aggregator::summarize_sales;
pub use sales_summary_service::SalesSummaryService;
