use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{ProfileView, ProviderSeed, Role};
use super::errors::StoreError;

/// Persistence contract for the reconciliation flow.
///
/// Implementations must map duplicate-key violations on the insert
/// methods to `StoreError::Conflict`; the flow relies on that to stay
/// idempotent under concurrent sessions.
#[async_trait]
pub trait ReconcileRepository: Send + Sync {
    async fn find_profile(&self, id: Uuid) -> Result<Option<ProfileView>, StoreError>;
    async fn insert_profile(&self, id: Uuid, email: &str, role: Role) -> Result<(), StoreError>;

    async fn find_provider_id_by_user(&self, user_id: Uuid) -> Result<Option<Uuid>, StoreError>;
    async fn insert_provider_seed(&self, seed: ProviderSeed) -> Result<(), StoreError>;
    /// All listing ids for an identity; the flow requires exactly one.
    async fn provider_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError>;
}

/// In-memory mock with failure knobs for exercising the flow's race and
/// partial-failure paths without a database.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub struct MockProviderRow {
        pub id: Uuid,
        pub seed: ProviderSeed,
    }

    #[derive(Default)]
    pub struct MockReconcileRepository {
        profiles: Mutex<HashMap<Uuid, ProfileView>>,
        providers: Mutex<Vec<MockProviderRow>>,
        /// Profile insert fails with a duplicate key, as if a concurrent
        /// session created the row between our read and write. The row is
        /// still stored (the other session's write).
        pub race_profile_insert: AtomicBool,
        /// Profile insert fails hard (store rejection).
        pub fail_profile_insert: AtomicBool,
        /// Provider insert fails with a duplicate key.
        pub race_provider_insert: AtomicBool,
        /// Provider insert reports success without storing a row, so the
        /// exactly-one re-fetch sees nothing.
        pub swallow_provider_insert: AtomicBool,
    }

    impl MockReconcileRepository {
        pub fn profile(&self, id: Uuid) -> Option<ProfileView> {
            self.profiles.lock().unwrap().get(&id).cloned()
        }

        pub fn profile_count(&self) -> usize {
            self.profiles.lock().unwrap().len()
        }

        pub fn providers_for(&self, user_id: Uuid) -> Vec<MockProviderRow> {
            self.providers
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.seed.user_id == user_id)
                .cloned()
                .collect()
        }

        pub fn seed_profile(&self, profile: ProfileView) {
            self.profiles.lock().unwrap().insert(profile.id, profile);
        }

        /// Insert a listing row directly, bypassing the uniqueness rule.
        pub fn seed_provider_row(&self, user_id: Uuid, email: &str) -> Uuid {
            let id = Uuid::new_v4();
            self.providers
                .lock()
                .unwrap()
                .push(MockProviderRow { id, seed: ProviderSeed::placeholder(user_id, email) });
            id
        }
    }

    #[async_trait]
    impl ReconcileRepository for MockReconcileRepository {
        async fn find_profile(&self, id: Uuid) -> Result<Option<ProfileView>, StoreError> {
            Ok(self.profiles.lock().unwrap().get(&id).cloned())
        }

        async fn insert_profile(&self, id: Uuid, email: &str, role: Role) -> Result<(), StoreError> {
            if self.fail_profile_insert.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("store rejected the write".into()));
            }
            let mut profiles = self.profiles.lock().unwrap();
            if self.race_profile_insert.load(Ordering::SeqCst) {
                profiles
                    .entry(id)
                    .or_insert_with(|| ProfileView { id, email: email.to_string(), role });
                return Err(StoreError::Conflict);
            }
            if profiles.contains_key(&id) {
                return Err(StoreError::Conflict);
            }
            profiles.insert(id, ProfileView { id, email: email.to_string(), role });
            Ok(())
        }

        async fn find_provider_id_by_user(&self, user_id: Uuid) -> Result<Option<Uuid>, StoreError> {
            Ok(self
                .providers
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.seed.user_id == user_id)
                .map(|r| r.id))
        }

        async fn insert_provider_seed(&self, seed: ProviderSeed) -> Result<(), StoreError> {
            if self.swallow_provider_insert.load(Ordering::SeqCst) {
                return Ok(());
            }
            let mut providers = self.providers.lock().unwrap();
            if self.race_provider_insert.load(Ordering::SeqCst) {
                if !providers.iter().any(|r| r.seed.user_id == seed.user_id) {
                    let user_id = seed.user_id;
                    let email = seed.business_email.clone();
                    providers.push(MockProviderRow {
                        id: Uuid::new_v4(),
                        seed: ProviderSeed::placeholder(user_id, &email),
                    });
                }
                return Err(StoreError::Conflict);
            }
            if providers.iter().any(|r| r.seed.user_id == seed.user_id) {
                return Err(StoreError::Conflict);
            }
            providers.push(MockProviderRow { id: Uuid::new_v4(), seed });
            Ok(())
        }

        async fn provider_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
            Ok(self
                .providers
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.seed.user_id == user_id)
                .map(|r| r.id)
                .collect())
        }
    }
}
