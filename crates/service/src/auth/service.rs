use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use jsonwebtoken::{encode, EncodingKey, Header as JwtHeader};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{AuthIdentity, AuthSession, LoginInput, SignupInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub password_algorithm: String,
}

/// Identity provider independent of the web framework: signup with a
/// hashed password, email confirmation, password login with JWT issuance.
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: String,
    pub exp: usize,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        Self { repo, cfg }
    }

    /// Create a new unconfirmed account with a hashed password.
    ///
    /// The returned identity carries the confirmation token the caller is
    /// expected to deliver out of band.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::SignupInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: None, password_algorithm: "argon2".into() });
    /// let input = SignupInput { email: "user@example.com".into(), password: "Secret123".into() };
    /// let identity = tokio_test::block_on(svc.signup(input)).unwrap();
    /// assert_eq!(identity.email, "user@example.com");
    /// assert!(!identity.confirmed);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn signup(&self, input: SignupInput) -> Result<AuthIdentity, AuthError> {
        if !input.email.contains('@') {
            return Err(AuthError::Validation("invalid email".into()));
        }
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if let Some(existing) = self.repo.find_identity_by_email(&input.email).await? {
            debug!("account exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let identity = self.repo.create_identity(&input.email).await?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let _cred = self
            .repo
            .upsert_password(identity.id, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(identity_id = %identity.id, email = %identity.email, "account_registered");
        Ok(identity)
    }

    /// Confirm the account addressed by an emailed token.
    pub async fn confirm(&self, token: Uuid) -> Result<AuthIdentity, AuthError> {
        let identity = self.repo.confirm_by_token(token).await?.ok_or(AuthError::NotFound)?;
        info!(identity_id = %identity.id, "account_confirmed");
        Ok(identity)
    }

    /// Authenticate an account and optionally issue a token.
    ///
    /// Unconfirmed accounts are rejected before the password is checked,
    /// matching the confirm-before-login rule of the signup flow.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let identity = self
            .repo
            .find_identity_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !identity.confirmed {
            return Err(AuthError::Unconfirmed);
        }

        let cred = self
            .repo
            .get_credentials(identity.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed =
            PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let mut token = None;
        if let Some(secret) = &self.cfg.jwt_secret {
            let exp = (chrono::Utc::now() + chrono::Duration::hours(12)).timestamp() as usize;
            let claims =
                Claims { sub: identity.email.clone(), uid: identity.id.to_string(), exp };
            token = Some(
                encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
                    .map_err(|e| AuthError::TokenError(e.to_string()))?,
            );
        }

        Ok(AuthSession { identity: identity.identity(), token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> AuthService<MockAuthRepository> {
        AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: Some("test-secret".into()), password_algorithm: "argon2".into() },
        )
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_email() {
        let svc = svc();
        let input = SignupInput { email: "dup@example.com".into(), password: "Passw0rd!".into() };
        svc.signup(input.clone()).await.unwrap();
        let err = svc.signup(input).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn login_requires_confirmation() {
        let svc = svc();
        let identity = svc
            .signup(SignupInput { email: "new@example.com".into(), password: "Passw0rd!".into() })
            .await
            .unwrap();

        let err = svc
            .login(LoginInput { email: "new@example.com".into(), password: "Passw0rd!".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unconfirmed));

        svc.confirm(identity.confirmation_token).await.unwrap();
        let session = svc
            .login(LoginInput { email: "new@example.com".into(), password: "Passw0rd!".into() })
            .await
            .unwrap();
        assert_eq!(session.identity.id, identity.id);
        assert!(session.token.is_some());
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let svc = svc();
        let identity = svc
            .signup(SignupInput { email: "p@example.com".into(), password: "Passw0rd!".into() })
            .await
            .unwrap();
        svc.confirm(identity.confirmation_token).await.unwrap();

        let err = svc
            .login(LoginInput { email: "p@example.com".into(), password: "wrong".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn confirm_with_unknown_token_fails() {
        let svc = svc();
        let err = svc.confirm(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }
}
