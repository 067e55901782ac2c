pub mod cut_report_service;
pub mod workbook;

pub use cut_report_service::{CutReportService, RenderedCut};
pub use workbook::render_workbook;
