use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::auth::{
    domain::{LoginInput, SignupInput},
    repo::seaorm::SeaOrmAuthRepository,
    service::{AuthConfig, AuthService},
};
use service::reconcile::{
    domain::Role, repo::seaorm::SeaOrmReconcileRepository, service::ReconcileService,
};

use crate::auth::{CurrentUser, ServerState, AUTH_COOKIE};
use crate::errors::ApiError;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub user_id: Uuid,
    pub email: String,
    pub confirmed: bool,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
    pub redirect: String,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub email: String,
}

fn auth_service(state: &ServerState) -> AuthService<SeaOrmAuthRepository> {
    let repo = Arc::new(SeaOrmAuthRepository { db: state.db.clone() });
    AuthService::new(
        repo,
        AuthConfig {
            jwt_secret: Some(state.auth.jwt_secret.clone()),
            password_algorithm: "argon2".into(),
        },
    )
}

#[utoipa::path(post, path = "/auth/signup", tag = "auth", request_body = crate::openapi::SignupRequestDoc, responses((status = 200, description = "Account created, confirmation pending"), (status = 400, description = "Bad Request"), (status = 409, description = "Email already registered")))]
pub async fn signup(
    State(state): State<ServerState>,
    Json(input): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, ApiError> {
    Role::parse(&input.role)
        .ok_or_else(|| ApiError::bad_request(format!("unknown role: {}", input.role)))?;

    let svc = auth_service(&state);
    let identity = svc
        .signup(SignupInput { email: input.email, password: input.password })
        .await?;

    let confirm_url = format!(
        "{}/auth/confirm/{}",
        state.auth.public_base_url.trim_end_matches('/'),
        identity.confirmation_token
    );
    let msg = common::mailer::ConfirmationMessage {
        to_email: identity.email.clone(),
        confirm_url,
    };
    // A failed relay must not lose the account; the token can be re-sent.
    if let Err(e) = state.mailer.send_confirmation(&msg).await {
        tracing::warn!(email = %identity.email, err = %e, "confirmation email failed to send");
    }

    Ok(Json(SignupResponse { user_id: identity.id, email: identity.email, confirmed: false }))
}

#[utoipa::path(get, path = "/auth/confirm/{token}", tag = "auth", responses((status = 200, description = "Account confirmed"), (status = 404, description = "Unknown token")))]
pub async fn confirm(
    State(state): State<ServerState>,
    Path(token): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let identity = auth_service(&state).confirm(token).await?;
    Ok(Json(serde_json::json!({"email": identity.email, "confirmed": true})))
}

/// Login is where account state is reconciled: the profile row (and, for
/// providers, the listing) is guaranteed before a redirect is handed out.
/// A reconciliation failure blocks the login.
#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequestDoc, responses((status = 200, description = "Logged in, body carries the redirect"), (status = 401, description = "Invalid credentials"), (status = 403, description = "Email not confirmed"), (status = 502, description = "Account reconciliation failed")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let role = Role::parse(&input.role)
        .ok_or_else(|| ApiError::bad_request(format!("unknown role: {}", input.role)))?;

    let svc = auth_service(&state);
    let session = svc
        .login(LoginInput { email: input.email, password: input.password })
        .await?;
    let token = session
        .token
        .ok_or_else(|| ApiError::internal("token generation failed"))?;

    let reconciler = ReconcileService::new(Arc::new(SeaOrmReconcileRepository::new(state.db.clone())));
    let target = reconciler.reconcile(&session.identity, role).await?;

    let mut cookie = Cookie::new(AUTH_COOKIE, token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);

    let out = LoginResponse {
        user_id: session.identity.id,
        email: session.identity.email,
        token,
        redirect: target.route(),
    };
    Ok((jar, Json(out)))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::from(AUTH_COOKIE));
    (jar, StatusCode::NO_CONTENT)
}

pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse { user_id: user.id, email: user.email })
}
