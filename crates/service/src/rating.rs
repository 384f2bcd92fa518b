//! Provider ratings: one star score plus a written review per submission.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{info, instrument};
use uuid::Uuid;

use models::{profile, rating};

use crate::errors::ServiceError;

/// A rating joined with the reviewer's email for display.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RatingView {
    pub id: Uuid,
    pub rating: i32,
    pub review: String,
    pub reviewer_email: String,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

/// Ratings for a listing, newest first.
pub async fn list_for_provider(
    db: &DatabaseConnection,
    provider_id: Uuid,
) -> Result<Vec<RatingView>, ServiceError> {
    let rows = rating::Entity::find()
        .filter(rating::Column::ProviderId.eq(provider_id))
        .order_by_desc(rating::Column::CreatedAt)
        .find_also_related(profile::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows
        .into_iter()
        .map(|(r, reviewer)| RatingView {
            id: r.id,
            rating: r.rating,
            review: r.review,
            reviewer_email: reviewer.map(|p| p.email).unwrap_or_default(),
            created_at: r.created_at,
        })
        .collect())
}

/// Record a rating. Validation happens before any store call so a bad
/// submission never reaches the database.
#[instrument(skip(db, review))]
pub async fn create(
    db: &DatabaseConnection,
    provider_id: Uuid,
    client_id: Uuid,
    stars: i32,
    review: &str,
) -> Result<rating::Model, ServiceError> {
    rating::validate(stars, review)?;
    let row = rating::ActiveModel {
        id: Set(Uuid::new_v4()),
        provider_id: Set(provider_id),
        client_id: Set(client_id),
        rating: Set(stars),
        review: Set(review.trim().to_string()),
        created_at: Set(chrono::Utc::now().into()),
    };
    let created = row.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(rating_id = %created.id, provider_id = %provider_id, "rating_recorded");
    Ok(created)
}
