use axum::{
    extract::{Multipart, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use service::listing::{self, OfferingDraft, ProviderUpdate};

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub location: String,
}

#[utoipa::path(get, path = "/providers", tag = "providers", params(("service" = Option<String>, Query, description = "Service term"), ("location" = Option<String>, Query, description = "Location term")), responses((status = 200, description = "Matching listings")))]
pub async fn search(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<models::provider::Model>>, ApiError> {
    let found = listing::search(&state.db, &params.service, &params.location).await?;
    Ok(Json(found))
}

#[utoipa::path(get, path = "/providers/{id}", tag = "providers", responses((status = 200, description = "Listing"), (status = 404, description = "Not Found")))]
pub async fn get_provider(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::provider::Model>, ApiError> {
    let found = listing::get_provider(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("provider not found"))?;
    Ok(Json(found))
}

/// Load the listing and require that the current user owns it.
async fn owned_listing(
    state: &ServerState,
    id: Uuid,
    user: &CurrentUser,
) -> Result<models::provider::Model, ApiError> {
    let found = listing::get_provider(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("provider not found"))?;
    if found.user_id != user.id {
        return Err(ApiError::forbidden("not the owner of this listing"));
    }
    Ok(found)
}

#[utoipa::path(put, path = "/providers/{id}", tag = "providers", request_body = crate::openapi::ProviderUpdateDoc, responses((status = 200, description = "Updated listing"), (status = 403, description = "Not the owner"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProviderUpdate>,
) -> Result<Json<models::provider::Model>, ApiError> {
    owned_listing(&state, id, &user).await?;
    let updated = listing::update_provider(&state.db, id, input).await?;
    Ok(Json(updated))
}

#[utoipa::path(get, path = "/providers/{id}/offerings", tag = "providers", responses((status = 200, description = "Offerings of a listing")))]
pub async fn list_offerings(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<models::offering::Model>>, ApiError> {
    let rows = listing::list_offerings(&state.db, id).await?;
    Ok(Json(rows))
}

#[utoipa::path(put, path = "/providers/{id}/offerings", tag = "providers", responses((status = 200, description = "Replaced offerings"), (status = 403, description = "Not the owner")))]
pub async fn replace_offerings(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(drafts): Json<Vec<OfferingDraft>>,
) -> Result<Json<Vec<models::offering::Model>>, ApiError> {
    owned_listing(&state, id, &user).await?;
    let rows = listing::replace_offerings(&state.db, id, drafts).await?;
    Ok(Json(rows))
}

#[utoipa::path(post, path = "/providers/{id}/logo", tag = "providers", responses((status = 200, description = "Logo stored, URL saved on the listing"), (status = 400, description = "No file in request"), (status = 403, description = "Not the owner")))]
pub async fn upload_logo(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<models::provider::Model>, ApiError> {
    owned_listing(&state, id, &user).await?;

    let mut stored: Option<String> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let ext = field
            .file_name()
            .and_then(|n| n.rsplit('.').next().map(str::to_ascii_lowercase))
            .unwrap_or_else(|| "png".to_string());
        let bytes = field.bytes().await.map_err(|e| ApiError::bad_request(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ApiError::bad_request("empty upload"));
        }
        let rel = format!("logos/{}-{}.{}", id, chrono::Utc::now().timestamp_millis(), ext);
        stored = Some(state.blob.upload(&rel, &bytes).await?);
        break;
    }

    let url = stored.ok_or_else(|| ApiError::bad_request("expected a 'file' form field"))?;
    let updated = listing::set_profile_image(&state.db, id, &url).await?;
    Ok(Json(updated))
}
