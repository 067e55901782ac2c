use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::middleware::SessionUser;
use crate::modules::loans::models::NewLoanEntry;
use crate::modules::loans::services::{net_balance, LedgerBucket, LedgerWindow, LoanService};
use crate::modules::users::models::Role;
use crate::modules::users::services::UserService;

/// Ledger filters; the window applies only when `date` is present
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerQuery {
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub bucket: Option<LedgerBucket>,
}

impl LedgerQuery {
    pub fn window(&self) -> Option<LedgerWindow> {
        self.date
            .map(|date| LedgerWindow::new(self.bucket.unwrap_or_default(), date))
    }
}

/// GET /api/loans
pub async fn list_loans(
    loans: web::Data<Arc<LoanService>>,
    users: web::Data<Arc<UserService>>,
    session: SessionUser,
    query: web::Query<LedgerQuery>,
) -> Result<HttpResponse, AppError> {
    users
        .require_role(session.0, |role: Role| role.can_manage_finances())
        .await?;

    let entries = loans
        .list_entries(query.employee_id, query.window())
        .await?;
    let balance = net_balance(&entries);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "entries": entries,
        "balance": balance,
    })))
}

/// POST /api/loans
pub async fn create_loan_entry(
    loans: web::Data<Arc<LoanService>>,
    users: web::Data<Arc<UserService>>,
    session: SessionUser,
    request: web::Json<NewLoanEntry>,
) -> Result<HttpResponse, AppError> {
    users
        .require_role(session.0, |role: Role| role.can_manage_finances())
        .await?;

    let entry = loans.record(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(entry))
}

/// GET /api/loans/{employeeId}/balance
///
/// Employees may read their own balance; anyone else needs the admin role.
pub async fn employee_balance(
    loans: web::Data<Arc<LoanService>>,
    users: web::Data<Arc<UserService>>,
    session: SessionUser,
    path: web::Path<Uuid>,
    query: web::Query<LedgerQuery>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    if session.0 != employee_id {
        users
            .require_role(session.0, |role: Role| role.can_manage_finances())
            .await?;
    }

    let balance = loans.balance(employee_id, query.window()).await?;
    Ok(HttpResponse::Ok().json(balance))
}

/// Configure loan routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/loans")
            .route("", web::get().to(list_loans))
            .route("", web::post().to(create_loan_entry))
            .route("/{employee_id}/balance", web::get().to(employee_balance)),
    );
}
