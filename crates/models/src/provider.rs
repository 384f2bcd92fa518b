use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider")]
pub struct Model {
    /// Generated listing id, never the identity id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning identity; unique at the schema level.
    pub user_id: Uuid,
    pub business_name: String,
    pub location: String,
    pub service_type: String,
    pub profile_image: String,
    pub business_email: String,
    pub phone_number: String,
    pub description: Option<String>,
    /// Denormalized free-text terms the search matches in addition to
    /// `service_type`.
    pub keywords: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Owner,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(profile::Entity)
                .from(Column::UserId)
                .to(profile::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
