use std::sync::Arc;

use actix_web::{error::ResponseError, web, HttpResponse};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::middleware::{ServiceRole, SessionUser};
use crate::modules::users::models::{CreateUserRequest, UpdateUserRequest};
use crate::modules::users::services::UserService;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserRequest {
    pub user_id: Option<Uuid>,
}

/// Provisioning endpoints answer failures as `{ "message": ... }`
fn message_error(err: AppError) -> HttpResponse {
    HttpResponse::build(err.status_code()).json(serde_json::json!({
        "message": err.to_string(),
    }))
}

/// Create auth identity and profile
/// POST /api/createuser
pub async fn create_user(
    service: web::Data<Arc<UserService>>,
    _caller: ServiceRole,
    request: web::Json<CreateUserRequest>,
) -> HttpResponse {
    match service.provision(request.into_inner()).await {
        Ok(provisioned) => HttpResponse::Ok().json(serde_json::json!({
            "message": "User created",
            "userId": provisioned.user_id,
        })),
        Err(e) => {
            error!("Failed to create user: {}", e);
            message_error(e)
        }
    }
}

/// Update identity email and profile
/// PUT /api/updateuser
pub async fn update_user(
    service: web::Data<Arc<UserService>>,
    _caller: ServiceRole,
    request: web::Json<UpdateUserRequest>,
) -> HttpResponse {
    match service.update(request.into_inner()).await {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({
            "message": "User updated",
            "role": user.role,
        })),
        Err(e) => {
            error!("Failed to update user: {}", e);
            message_error(e)
        }
    }
}

/// Delete identity and profile
/// POST /api/delete-user
pub async fn delete_user(
    service: web::Data<Arc<UserService>>,
    _caller: ServiceRole,
    request: web::Json<DeleteUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = request
        .user_id
        .ok_or_else(|| AppError::validation("userId is required"))?;

    service.delete(user_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// List staff profiles
/// GET /api/users
pub async fn list_users(
    service: web::Data<Arc<UserService>>,
    _session: SessionUser,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse, AppError> {
    let users = service.list(query.page, query.limit).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Single staff profile
/// GET /api/users/{id}
pub async fn get_user(
    service: web::Data<Arc<UserService>>,
    _session: SessionUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.get(path.into_inner()).await?))
}

/// Configure user routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/createuser", web::post().to(create_user))
        .route("/updateuser", web::put().to(update_user))
        .route("/delete-user", web::post().to(delete_user))
        .route("/users", web::get().to(list_users))
        .route("/users/{id}", web::get().to(get_user));
}
