// Sales module: sale registration, product sales and sales summaries

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{EmployeeSalesSummary, PaymentMethod, ProductSale, SaleItem, SaleRecord};
pub use repositories::{ProductSaleRepository, SaleRepository};
pub use services::{summarize_sales, DateWindow, ProductSaleService, SaleService, SalesSummaryService};
