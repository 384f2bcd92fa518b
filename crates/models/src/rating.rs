use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors, profile, provider};

pub const MIN_STARS: i32 = 1;
pub const MAX_STARS: i32 = 5;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rating")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider_id: Uuid,
    pub client_id: Uuid,
    pub rating: i32,
    pub review: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Provider,
    Client,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Provider => Entity::belongs_to(provider::Entity)
                .from(Column::ProviderId)
                .to(provider::Column::Id)
                .into(),
            Relation::Client => Entity::belongs_to(profile::Entity)
                .from(Column::ClientId)
                .to(profile::Column::Id)
                .into(),
        }
    }
}

impl Related<profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Reject out-of-range stars and blank reviews before any store call.
pub fn validate(stars: i32, review: &str) -> Result<(), errors::ModelError> {
    if !(MIN_STARS..=MAX_STARS).contains(&stars) {
        return Err(errors::ModelError::Validation(format!(
            "rating must be between {MIN_STARS} and {MAX_STARS}"
        )));
    }
    if review.trim().is_empty() {
        return Err(errors::ModelError::Validation("review must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_six_stars() {
        assert!(validate(0, "fine work").is_err());
        assert!(validate(6, "fine work").is_err());
        assert!(validate(1, "fine work").is_ok());
        assert!(validate(5, "fine work").is_ok());
    }

    #[test]
    fn rejects_blank_review() {
        assert!(validate(4, "").is_err());
        assert!(validate(4, "   ").is_err());
    }
}
