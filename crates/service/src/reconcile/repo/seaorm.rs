use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use crate::reconcile::domain::{ProfileView, ProviderSeed, Role};
use crate::reconcile::errors::StoreError;
use crate::reconcile::repository::ReconcileRepository;

/// SeaORM-backed store for the reconciliation flow.
pub struct SeaOrmReconcileRepository {
    db: DatabaseConnection,
}

impl SeaOrmReconcileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn map_insert_err(e: DbErr) -> StoreError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::Conflict,
        _ => StoreError::Unavailable(e.to_string()),
    }
}

fn map_query_err(e: DbErr) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl ReconcileRepository for SeaOrmReconcileRepository {
    async fn find_profile(&self, id: Uuid) -> Result<Option<ProfileView>, StoreError> {
        let row = models::profile::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_query_err)?;
        match row {
            None => Ok(None),
            Some(p) => {
                let role = Role::parse(&p.role).ok_or_else(|| {
                    StoreError::Unavailable(format!("unknown role '{}' stored for {}", p.role, p.id))
                })?;
                Ok(Some(ProfileView { id: p.id, email: p.email, role }))
            }
        }
    }

    async fn insert_profile(&self, id: Uuid, email: &str, role: Role) -> Result<(), StoreError> {
        let row = models::profile::ActiveModel {
            id: Set(id),
            email: Set(email.to_string()),
            role: Set(role.as_str().to_string()),
            name: Set(None),
            surname: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };
        row.insert(&self.db).await.map(|_| ()).map_err(map_insert_err)
    }

    async fn find_provider_id_by_user(&self, user_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let row = models::provider::Entity::find()
            .filter(models::provider::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(map_query_err)?;
        Ok(row.map(|p| p.id))
    }

    async fn insert_provider_seed(&self, seed: ProviderSeed) -> Result<(), StoreError> {
        let now = chrono::Utc::now();
        let row = models::provider::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(seed.user_id),
            business_name: Set(seed.business_name),
            location: Set(seed.location),
            service_type: Set(seed.service_type),
            profile_image: Set(seed.profile_image),
            business_email: Set(seed.business_email),
            phone_number: Set(seed.phone_number),
            description: Set(None),
            keywords: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        row.insert(&self.db).await.map(|_| ()).map_err(map_insert_err)
    }

    async fn provider_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let rows = models::provider::Entity::find()
            .filter(models::provider::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(map_query_err)?;
        Ok(rows.into_iter().map(|p| p.id).collect())
    }
}
