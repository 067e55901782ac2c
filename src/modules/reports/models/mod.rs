pub mod cut_report;

pub use cut_report::{
    compute_cut, CutAmounts, CutPeriod, CutReport, CutReportRequest, EmployeeCut,
    ProductSalesLine, SettlementOutcome,
};
