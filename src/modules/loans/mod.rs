// Loans module: ledger of advances to employees and their repayments

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{LoanEntry, LoanOperation};
pub use repositories::LoanRepository;
pub use services::{net_balance, LedgerBucket, LedgerWindow, LoanService};
