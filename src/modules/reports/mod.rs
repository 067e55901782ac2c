// Reports module: cut (cash reconciliation) workbooks

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{CutReport, CutReportRequest, SettlementOutcome};
pub use services::CutReportService;
