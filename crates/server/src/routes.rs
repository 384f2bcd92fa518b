use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::auth::ServerState;
use crate::openapi::ApiDoc;

pub mod auth;
pub mod contact;
pub mod profile;
pub mod providers;
pub mod ratings;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service healthy")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public reads and auth endpoints,
/// token-guarded writes, uploaded images as static files, Swagger UI.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let uploads_dir = state.blob.root().to_path_buf();
    let uploads_prefix = state.blob.public_prefix().to_string();

    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/confirm/:token", get(auth::confirm))
        .route("/providers", get(providers::search))
        .route("/providers/:id", get(providers::get_provider))
        .route("/providers/:id/offerings", get(providers::list_offerings))
        .route("/providers/:id/ratings", get(ratings::list));

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/profile", get(profile::show))
        .route("/providers/:id", put(providers::update))
        .route("/providers/:id/offerings", put(providers::replace_offerings))
        .route("/providers/:id/logo", post(providers::upload_logo))
        .route("/providers/:id/ratings", post(ratings::create))
        .route("/contact", post(contact::send))
        .route_layer(middleware::from_fn_with_state(state.clone(), crate::auth::require_auth));

    public
        .merge(protected)
        .nest_service(&uploads_prefix, ServeDir::new(uploads_dir))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
