use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AuthIdentity, Credentials};
use super::errors::AuthError;

/// Repository abstraction for identity-provider persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_identity_by_email(&self, email: &str) -> Result<Option<AuthIdentity>, AuthError>;
    async fn create_identity(&self, email: &str) -> Result<AuthIdentity, AuthError>;
    /// Flip the account addressed by `token` to confirmed; `None` when the
    /// token matches nothing.
    async fn confirm_by_token(&self, token: Uuid) -> Result<Option<AuthIdentity>, AuthError>;

    async fn get_credentials(&self, identity_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(
        &self,
        identity_id: Uuid,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<Credentials, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        identities: Mutex<HashMap<String, AuthIdentity>>, // key: email
        creds: Mutex<HashMap<Uuid, Credentials>>,         // key: identity_id
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_identity_by_email(&self, email: &str) -> Result<Option<AuthIdentity>, AuthError> {
            let identities = self.identities.lock().unwrap();
            Ok(identities.get(email).cloned())
        }

        async fn create_identity(&self, email: &str) -> Result<AuthIdentity, AuthError> {
            let mut identities = self.identities.lock().unwrap();
            if identities.contains_key(email) {
                return Err(AuthError::Conflict);
            }
            let identity = AuthIdentity {
                id: Uuid::new_v4(),
                email: email.to_string(),
                confirmed: false,
                confirmation_token: Uuid::new_v4(),
            };
            identities.insert(email.to_string(), identity.clone());
            Ok(identity)
        }

        async fn confirm_by_token(&self, token: Uuid) -> Result<Option<AuthIdentity>, AuthError> {
            let mut identities = self.identities.lock().unwrap();
            for identity in identities.values_mut() {
                if identity.confirmation_token == token {
                    identity.confirmed = true;
                    return Ok(Some(identity.clone()));
                }
            }
            Ok(None)
        }

        async fn get_credentials(&self, identity_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(&identity_id).cloned())
        }

        async fn upsert_password(
            &self,
            identity_id: Uuid,
            password_hash: String,
            password_algorithm: String,
        ) -> Result<Credentials, AuthError> {
            let mut creds = self.creds.lock().unwrap();
            let c = Credentials { identity_id, password_hash, password_algorithm };
            creds.insert(identity_id, c.clone());
            Ok(c)
        }
    }
}
