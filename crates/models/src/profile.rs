use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity;

pub const ROLE_CLIENT: &str = "client";
pub const ROLE_PROVIDER: &str = "provider";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    /// Shared primary key: equals the owning identity's id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Identity,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Identity => Entity::belongs_to(identity::Entity)
                .from(Column::Id)
                .to(identity::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
