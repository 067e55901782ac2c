use std::sync::Arc;

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::core::error::AppError;
use crate::middleware::SessionUser;
use crate::modules::media::models::MediaChangeSet;
use crate::modules::media::services::{MediaService, MediaUpload};
use crate::modules::users::models::Role;
use crate::modules::users::services::UserService;

const FILE_NAME_HEADER: &str = "X-File-Name";

/// Largest accepted upload body
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

fn header_value(req: &HttpRequest, name: impl header::AsHeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// GET /api/media
pub async fn list_media(
    service: web::Data<Arc<MediaService>>,
    _session: SessionUser,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.list().await?))
}

/// POST /api/media
///
/// The body is the raw file; `X-File-Name` and `Content-Type` describe it.
pub async fn upload_media(
    media: web::Data<Arc<MediaService>>,
    users: web::Data<Arc<UserService>>,
    session: SessionUser,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    users
        .require_role(session.0, |role: Role| role.can_manage_finances())
        .await?;

    let file_name = header_value(&req, FILE_NAME_HEADER)
        .ok_or_else(|| AppError::validation("X-File-Name header is required"))?;
    let content_type = header_value(&req, header::CONTENT_TYPE)
        .ok_or_else(|| AppError::validation("Content-Type header is required"))?;

    let item = media
        .upload(MediaUpload {
            owner: session.0,
            file_name,
            content_type,
            body,
        })
        .await?;

    Ok(HttpResponse::Created().json(item))
}

/// DELETE /api/media/{id}
pub async fn delete_media(
    media: web::Data<Arc<MediaService>>,
    users: web::Data<Arc<UserService>>,
    session: SessionUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    users
        .require_role(session.0, |role: Role| role.can_manage_finances())
        .await?;

    media.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/media/commit
pub async fn commit_media(
    media: web::Data<Arc<MediaService>>,
    users: web::Data<Arc<UserService>>,
    session: SessionUser,
    request: web::Json<MediaChangeSet>,
) -> Result<HttpResponse, AppError> {
    users
        .require_role(session.0, |role: Role| role.can_manage_finances())
        .await?;

    let updated = media.commit(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Configure media routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/media")
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
            .route("", web::get().to(list_media))
            .route("", web::post().to(upload_media))
            .route("/commit", web::post().to(commit_media))
            .route("/{id}", web::delete().to(delete_media)),
    );
}
