use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::auth::domain::{AuthIdentity, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use models::{credentials, identity};

fn to_domain(m: identity::Model) -> AuthIdentity {
    AuthIdentity {
        id: m.id,
        email: m.email,
        confirmed: m.confirmed_at.is_some(),
        confirmation_token: m.confirmation_token,
    }
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_identity_by_email(&self, email: &str) -> Result<Option<AuthIdentity>, AuthError> {
        let found = identity::Entity::find()
            .filter(identity::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(found.map(to_domain))
    }

    async fn create_identity(&self, email: &str) -> Result<AuthIdentity, AuthError> {
        let created = identity::create(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(to_domain(created))
    }

    async fn confirm_by_token(&self, token: Uuid) -> Result<Option<AuthIdentity>, AuthError> {
        let found = identity::Entity::find()
            .filter(identity::Column::ConfirmationToken.eq(token))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        let Some(found) = found else { return Ok(None) };
        if found.confirmed_at.is_some() {
            return Ok(Some(to_domain(found)));
        }
        let mut am: identity::ActiveModel = found.into();
        am.confirmed_at = Set(Some(Utc::now().into()));
        let updated = am.update(&self.db).await.map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(Some(to_domain(updated)))
    }

    async fn get_credentials(&self, identity_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let found = credentials::Entity::find_by_id(identity_id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(found.map(|c| Credentials {
            identity_id: c.identity_id,
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        }))
    }

    async fn upsert_password(
        &self,
        identity_id: Uuid,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<Credentials, AuthError> {
        let stored =
            credentials::upsert_password(&self.db, identity_id, password_hash, &password_algorithm)
                .await
                .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(Credentials {
            identity_id: stored.identity_id,
            password_hash: stored.password_hash,
            password_algorithm: stored.password_algorithm,
        })
    }
}
