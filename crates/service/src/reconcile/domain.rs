use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::auth::domain::Identity;

/// Role an account declares on the login/signup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Provider,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => models::profile::ROLE_CLIENT,
            Role::Provider => models::profile::ROLE_PROVIDER,
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            models::profile::ROLE_CLIENT => Some(Role::Client),
            models::profile::ROLE_PROVIDER => Some(Role::Provider),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a successful login lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    /// Service-discovery screen for clients.
    Discovery,
    /// Provider-profile screen, addressed by the listing's generated id.
    ProviderProfile(Uuid),
}

impl RedirectTarget {
    pub fn route(&self) -> String {
        match self {
            RedirectTarget::Discovery => "/services".to_string(),
            RedirectTarget::ProviderProfile(id) => format!("/provider/{id}"),
        }
    }
}

/// Minimal profile view the reconciliation flow reads back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Blank listing seeded for a first-time provider; the provider fills the
/// fields in later through the self-service edit flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSeed {
    pub user_id: Uuid,
    pub business_name: String,
    pub location: String,
    pub service_type: String,
    pub profile_image: String,
    pub business_email: String,
    pub phone_number: String,
}

impl ProviderSeed {
    pub fn placeholder(user_id: Uuid, email: &str) -> Self {
        Self {
            user_id,
            business_name: " ".into(),
            location: " ".into(),
            service_type: " ".into(),
            profile_image: " ".into(),
            business_email: email.to_string(),
            phone_number: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(Role::parse("client"), Some(Role::Client));
        assert_eq!(Role::parse("provider"), Some(Role::Provider));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::Provider.as_str(), "provider");
    }

    #[test]
    fn redirect_routes() {
        assert_eq!(RedirectTarget::Discovery.route(), "/services");
        let id = Uuid::new_v4();
        assert_eq!(RedirectTarget::ProviderProfile(id).route(), format!("/provider/{id}"));
    }
}
