use axum::{extract::State, Extension, Json};
use sea_orm::EntityTrait;
use serde::Serialize;
use uuid::Uuid;

use service::listing;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

#[derive(Serialize)]
pub struct ProviderSummary {
    pub id: Uuid,
    pub business_name: String,
    pub location: String,
    pub service_type: String,
    pub profile_image: String,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    /// Present when the account owns a listing.
    pub provider: Option<ProviderSummary>,
}

#[utoipa::path(get, path = "/profile", tag = "profile", responses((status = 200, description = "Current account's profile"), (status = 404, description = "No profile yet")))]
pub async fn show(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = models::profile::Entity::find_by_id(user.id)
        .one(&state.db)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("profile not found"))?;

    let provider = listing::find_by_user(&state.db, user.id).await?.map(|p| ProviderSummary {
        id: p.id,
        business_name: p.business_name,
        location: p.location,
        service_type: p.service_type,
        profile_image: p.profile_image,
    });

    Ok(Json(ProfileResponse {
        id: profile.id,
        email: profile.email,
        role: profile.role,
        name: profile.name,
        surname: profile.surname,
        provider,
    }))
}
