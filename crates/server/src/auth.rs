//! Server-side auth state and the bearer/cookie guard for protected routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use service::auth::service::Claims;
use service::blob::BlobStore;

use crate::errors::ApiError;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    /// Base URL used to build confirmation links in signup emails.
    pub public_base_url: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub blob: BlobStore,
    pub mailer: common::mailer::Mailer,
}

/// Identity decoded from the request token, available to protected
/// handlers as an extension.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

fn token_from_request(req: &Request) -> Option<String> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return h.strip_prefix("Bearer ").map(str::to_string);
    }
    // Cookie fallback for browser sessions
    let cookie_header =
        req.headers().get(header::COOKIE).and_then(|v| v.to_str().ok()).unwrap_or("");
    for part in cookie_header.split(';') {
        if let Some(rest) = part.trim().strip_prefix("auth_token=") {
            if !rest.is_empty() {
                return Some(rest.to_string());
            }
        }
    }
    None
}

/// Route-layer guard: verifies the JWT and injects [`CurrentUser`].
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = token_from_request(&req)
        .ok_or_else(|| ApiError::unauthorized("missing bearer token or auth cookie"))?;

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(&token, &key, &validation).map_err(|e| {
        tracing::warn!(path = %req.uri().path(), err = %e, "token validation failed");
        ApiError::unauthorized("invalid or expired token")
    })?;
    let id = Uuid::parse_str(&data.claims.uid)
        .map_err(|_| ApiError::unauthorized("malformed token subject"))?;

    req.extensions_mut().insert(CurrentUser { id, email: data.claims.sub });
    Ok(next.run(req).await)
}
