//! Salon administration backend
//!
//! Staff provisioning, product and service catalog, sale registration,
//! employee loan ledger, sales summaries and the cut report workbook.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

pub use app::{AppSettings, AppState, ExternalServices, Repositories};
