pub mod product_sale;
pub mod sale;
pub mod summary;

pub use product_sale::{NewProductSale, ProductSale};
pub use sale::{
    CreatedSale, NewSale, NewSaleItem, PaymentMethod, SaleDraft, SaleItem, SaleItemDraft,
    SaleRecord,
};
pub use summary::{EmployeeSalesSummary, SaleWithItems};
