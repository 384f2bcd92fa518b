use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{Identity, ProviderSeed, RedirectTarget, Role};
use super::errors::{ReconcileError, StoreError};
use super::repository::ReconcileRepository;

/// Login-time reconciliation flow.
///
/// Guarantees that the authenticated identity has a profile row and, when
/// it declared the provider role, a single listing row, then decides the
/// redirect. Creates are duplicate-key-tolerant so a second session racing
/// the same identity cannot fail the login; nothing is ever retried or
/// deleted here. The login route is the sole caller.
pub struct ReconcileService<R: ReconcileRepository> {
    repo: Arc<R>,
}

impl<R: ReconcileRepository> ReconcileService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, identity), fields(identity_id = %identity.id, role = %role))]
    pub async fn reconcile(
        &self,
        identity: &Identity,
        role: Role,
    ) -> Result<RedirectTarget, ReconcileError> {
        // Profile step. An existing profile is left untouched: this flow
        // never upgrades or downgrades a stored role.
        let existing = self
            .repo
            .find_profile(identity.id)
            .await
            .map_err(|e| ReconcileError::ProfileLookupFailed(e.to_string()))?;
        if existing.is_none() {
            match self.repo.insert_profile(identity.id, &identity.email, role).await {
                Ok(()) => {
                    info!(identity_id = %identity.id, role = %role, "profile_created");
                }
                Err(StoreError::Conflict) => {
                    debug!(identity_id = %identity.id, "profile already created by a concurrent session");
                }
                Err(e) => return Err(ReconcileError::ProfileCreateFailed(e.to_string())),
            }
        }

        // Provider step: seed a blank listing the provider fills in later.
        if role == Role::Provider {
            let existing = self
                .repo
                .find_provider_id_by_user(identity.id)
                .await
                .map_err(|e| ReconcileError::ProviderLookupFailed(e.to_string()))?;
            if existing.is_none() {
                let seed = ProviderSeed::placeholder(identity.id, &identity.email);
                match self.repo.insert_provider_seed(seed).await {
                    Ok(()) => {
                        info!(identity_id = %identity.id, "provider_listing_seeded");
                    }
                    Err(StoreError::Conflict) => {
                        debug!(identity_id = %identity.id, "listing already seeded by a concurrent session");
                    }
                    Err(e) => return Err(ReconcileError::ProviderCreateFailed(e.to_string())),
                }
            }
        }

        // Redirect decision. Providers land on their listing, addressed by
        // the generated id, which must exist exactly once by now.
        match role {
            Role::Client => Ok(RedirectTarget::Discovery),
            Role::Provider => {
                let ids = self
                    .repo
                    .provider_ids_for_user(identity.id)
                    .await
                    .map_err(|e| ReconcileError::ProviderLookupFailed(e.to_string()))?;
                match ids.as_slice() {
                    [id] => Ok(RedirectTarget::ProviderProfile(*id)),
                    [] => Err(ReconcileError::ProviderLookupFailed(
                        "no listing found after create".into(),
                    )),
                    _ => Err(ReconcileError::ProviderLookupFailed(format!(
                        "{} listings found for one identity, expected exactly one",
                        ids.len()
                    ))),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::repository::mock::MockReconcileRepository;
    use std::sync::atomic::Ordering;
    use uuid::Uuid;

    fn identity() -> Identity {
        Identity { id: Uuid::new_v4(), email: format!("u_{}@example.com", Uuid::new_v4()) }
    }

    fn svc(repo: &Arc<MockReconcileRepository>) -> ReconcileService<MockReconcileRepository> {
        ReconcileService::new(Arc::clone(repo))
    }

    #[tokio::test]
    async fn new_client_gets_profile_and_discovery_redirect() {
        let repo = Arc::new(MockReconcileRepository::default());
        let ident = identity();

        let target = svc(&repo).reconcile(&ident, Role::Client).await.unwrap();
        assert_eq!(target, RedirectTarget::Discovery);

        let profile = repo.profile(ident.id).unwrap();
        assert_eq!(profile.role, Role::Client);
        assert_eq!(profile.email, ident.email);
        assert!(repo.providers_for(ident.id).is_empty());
    }

    #[tokio::test]
    async fn new_provider_gets_placeholder_listing_and_redirect_to_it() {
        let repo = Arc::new(MockReconcileRepository::default());
        let ident = identity();

        let target = svc(&repo).reconcile(&ident, Role::Provider).await.unwrap();

        let rows = repo.providers_for(ident.id);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_ne!(row.id, ident.id, "listing id must be generated, not the identity id");
        assert_eq!(row.seed.business_name, " ");
        assert_eq!(row.seed.business_email, ident.email);
        assert_eq!(row.seed.phone_number, "");
        assert_eq!(target, RedirectTarget::ProviderProfile(row.id));
        assert_eq!(repo.profile(ident.id).unwrap().role, Role::Provider);
    }

    #[tokio::test]
    async fn reconcile_twice_is_idempotent() {
        let repo = Arc::new(MockReconcileRepository::default());
        let ident = identity();
        let svc = svc(&repo);

        let first = svc.reconcile(&ident, Role::Provider).await.unwrap();
        let second = svc.reconcile(&ident, Role::Provider).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.profile_count(), 1);
        assert_eq!(repo.providers_for(ident.id).len(), 1);
    }

    #[tokio::test]
    async fn duplicate_key_from_concurrent_session_is_success() {
        let repo = Arc::new(MockReconcileRepository::default());
        repo.race_profile_insert.store(true, Ordering::SeqCst);
        repo.race_provider_insert.store(true, Ordering::SeqCst);
        let ident = identity();

        let target = svc(&repo).reconcile(&ident, Role::Provider).await.unwrap();

        assert_eq!(repo.profile_count(), 1);
        let rows = repo.providers_for(ident.id);
        assert_eq!(rows.len(), 1);
        assert_eq!(target, RedirectTarget::ProviderProfile(rows[0].id));
    }

    #[tokio::test]
    async fn profile_store_rejection_blocks_the_flow() {
        let repo = Arc::new(MockReconcileRepository::default());
        repo.fail_profile_insert.store(true, Ordering::SeqCst);
        let ident = identity();

        let err = svc(&repo).reconcile(&ident, Role::Provider).await.unwrap_err();
        assert!(matches!(err, ReconcileError::ProfileCreateFailed(_)));
        // The provider step must not have run.
        assert!(repo.providers_for(ident.id).is_empty());
    }

    #[tokio::test]
    async fn missing_listing_after_reported_create_is_a_lookup_failure() {
        let repo = Arc::new(MockReconcileRepository::default());
        repo.swallow_provider_insert.store(true, Ordering::SeqCst);
        let ident = identity();

        let err = svc(&repo).reconcile(&ident, Role::Provider).await.unwrap_err();
        assert!(matches!(err, ReconcileError::ProviderLookupFailed(_)));
    }

    #[tokio::test]
    async fn more_than_one_listing_is_a_lookup_failure() {
        let repo = Arc::new(MockReconcileRepository::default());
        let ident = identity();
        repo.seed_provider_row(ident.id, &ident.email);
        repo.seed_provider_row(ident.id, &ident.email);

        let err = svc(&repo).reconcile(&ident, Role::Provider).await.unwrap_err();
        assert!(matches!(err, ReconcileError::ProviderLookupFailed(_)));
    }

    #[tokio::test]
    async fn existing_profile_role_is_never_changed() {
        let repo = Arc::new(MockReconcileRepository::default());
        let ident = identity();
        repo.seed_profile(super::super::domain::ProfileView {
            id: ident.id,
            email: ident.email.clone(),
            role: Role::Provider,
        });

        let target = svc(&repo).reconcile(&ident, Role::Client).await.unwrap();
        assert_eq!(target, RedirectTarget::Discovery);
        assert_eq!(repo.profile(ident.id).unwrap().role, Role::Provider);
    }
}
