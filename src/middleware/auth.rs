use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::core::AppError;

/// Audience the hosted Auth service stamps on user session tokens
const SESSION_AUDIENCE: &str = "authenticated";

/// Keys used to authenticate API callers
///
/// Staff calls carry a session JWT issued by the hosted Auth service (HS256,
/// signed with the project JWT secret). Provisioning calls carry the
/// service-role key itself as bearer token.
pub struct AuthSettings {
    decoding: DecodingKey,
    validation: Validation,
    service_role_key: String,
}

impl AuthSettings {
    pub fn new(jwt_secret: &str, service_role_key: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[SESSION_AUDIENCE]);

        Self {
            decoding: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
            service_role_key: service_role_key.to_string(),
        }
    }

    fn verify_session(&self, token: &str) -> Result<SessionClaims, AppError> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::unauthorized(format!("Invalid or expired session: {}", e)))
    }

    fn is_service_key(&self, token: &str) -> bool {
        let expected = self.service_role_key.as_bytes();
        let given = token.as_bytes();
        // Compare every byte so timing does not leak the matching prefix
        expected.len() == given.len()
            && expected
                .iter()
                .zip(given)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: Uuid,
}

/// Signed-in staff member, taken from the session token's subject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser(pub Uuid);

/// Marker for requests authenticated with the service-role key
#[derive(Debug, Clone, Copy)]
pub struct ServiceRole;

fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid auth scheme"))
}

fn auth_settings(req: &HttpRequest) -> Result<&web::Data<AuthSettings>, AppError> {
    req.app_data::<web::Data<AuthSettings>>()
        .ok_or_else(|| AppError::internal("Authentication is not configured"))
}

fn extract_session(req: &HttpRequest) -> Result<SessionUser, AppError> {
    let settings = auth_settings(req)?;
    let token = bearer_token(req)?;
    let claims = settings.verify_session(token)?;
    Ok(SessionUser(claims.sub))
}

fn extract_service_role(req: &HttpRequest) -> Result<ServiceRole, AppError> {
    let settings = auth_settings(req)?;
    let token = bearer_token(req)?;
    if settings.is_service_key(token) {
        Ok(ServiceRole)
    } else {
        Err(AppError::unauthorized("Service-role credentials required"))
    }
}

impl FromRequest for SessionUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract_session(req))
    }
}

impl FromRequest for ServiceRole {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract_service_role(req))
    }
}
