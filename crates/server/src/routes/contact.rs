use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use common::mailer::ContactMessage;
use service::listing;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

#[derive(Deserialize)]
pub struct ContactRequest {
    pub provider_id: Uuid,
    pub from_name: String,
    pub message: String,
}

/// Relay a client's message to the listing's business email. The sender's
/// address comes from the authenticated session, not the request body.
#[utoipa::path(post, path = "/contact", tag = "contact", request_body = crate::openapi::ContactRequestDoc, responses((status = 200, description = "Message relayed"), (status = 400, description = "Blank message"), (status = 404, description = "Unknown provider"), (status = 502, description = "Relay failed")))]
pub async fn send(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<ContactRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if input.message.trim().is_empty() {
        return Err(ApiError::bad_request("message must not be empty"));
    }
    let provider = listing::get_provider(&state.db, input.provider_id)
        .await?
        .ok_or_else(|| ApiError::not_found("provider not found"))?;

    let msg = ContactMessage {
        from_name: input.from_name,
        reply_to: user.email,
        message: input.message,
        to_email: provider.business_email,
    };
    state
        .mailer
        .send_contact(&msg)
        .await
        .map_err(|e| ApiError::new(axum::http::StatusCode::BAD_GATEWAY, e.to_string()))?;
    Ok(Json(serde_json::json!({"sent": true})))
}
