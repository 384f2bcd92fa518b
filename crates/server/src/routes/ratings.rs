use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use service::rating::{self, RatingView};

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

#[derive(Deserialize)]
pub struct RatingRequest {
    pub rating: i32,
    pub review: String,
}

#[utoipa::path(get, path = "/providers/{id}/ratings", tag = "ratings", responses((status = 200, description = "Ratings, newest first")))]
pub async fn list(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RatingView>>, ApiError> {
    let rows = rating::list_for_provider(&state.db, id).await?;
    Ok(Json(rows))
}

#[utoipa::path(post, path = "/providers/{id}/ratings", tag = "ratings", request_body = crate::openapi::RatingRequestDoc, responses((status = 200, description = "Rating recorded"), (status = 400, description = "Invalid stars or blank review")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<RatingRequest>,
) -> Result<Json<models::rating::Model>, ApiError> {
    let created = rating::create(&state.db, id, user.id, input.rating, &input.review).await?;
    Ok(Json(created))
}
