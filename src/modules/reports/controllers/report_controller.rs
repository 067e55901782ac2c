use std::sync::Arc;

use actix_web::{http::header, web, HttpResponse};
use tracing::error;

use crate::core::error::AppError;
use crate::middleware::SessionUser;
use crate::modules::reports::models::CutReportRequest;
use crate::modules::reports::services::CutReportService;
use crate::modules::users::models::Role;
use crate::modules::users::services::UserService;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Per-report settlement counts, e.g. `recorded=2; failed=0`
const SETTLEMENTS_HEADER: &str = "X-Settlements";

/// POST /api/report
///
/// Streams the cut workbook. Validation problems answer 400, anything else
/// 500, both as `{ "error": ... }`.
pub async fn generate_cut_report(
    reports: web::Data<Arc<CutReportService>>,
    users: web::Data<Arc<UserService>>,
    session: SessionUser,
    request: web::Json<CutReportRequest>,
) -> Result<HttpResponse, AppError> {
    users
        .require_role(session.0, |role: Role| role.can_manage_finances())
        .await?;

    let rendered = reports.generate(&request).await.map_err(|e| {
        error!("Failed to generate cut report: {}", e);
        e
    })?;

    let settlements = format!(
        "recorded={}; failed={}",
        rendered.report.settlements_recorded(),
        rendered.report.settlements_failed()
    );

    Ok(HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", rendered.filename),
        ))
        .insert_header((SETTLEMENTS_HEADER, settlements))
        .body(rendered.bytes))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/report", web::post().to(generate_cut_report));
}
