pub mod loan_ledger;
pub mod loan_service;

pub use loan_ledger::{net_balance, LedgerBucket, LedgerWindow};
pub use loan_service::LoanService;
