use thiserror::Error;

/// Low-level store outcome the repository reports back to the flow.
/// `Conflict` is the duplicate-key case the flow treats as success.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failures of the reconciliation flow, each scoped to one login attempt.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("error checking profile: {0}")]
    ProfileLookupFailed(String),
    #[error("profile not found, and failed to create one: {0}")]
    ProfileCreateFailed(String),
    #[error("provider record failed to create: {0}")]
    ProviderCreateFailed(String),
    #[error("failed to fetch provider listing: {0}")]
    ProviderLookupFailed(String),
}

impl ReconcileError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ReconcileError::ProfileLookupFailed(_) => 2001,
            ReconcileError::ProfileCreateFailed(_) => 2002,
            ReconcileError::ProviderCreateFailed(_) => 2003,
            ReconcileError::ProviderLookupFailed(_) => 2004,
        }
    }
}
