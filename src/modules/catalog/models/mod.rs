pub mod product;
pub mod service;

pub use product::{NewProduct, Product, ProductPatch};
pub use service::{NewService, SalonService};
