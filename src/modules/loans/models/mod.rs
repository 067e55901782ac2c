pub mod loan;

pub use loan::{LoanBalance, LoanEntry, LoanOperation, LoanQuery, NewLoanEntry};
