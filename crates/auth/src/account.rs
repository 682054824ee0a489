//! User accounts: registration, login, and the dummy-login test shortcut.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use pickpoint_core::{DomainError, StoreError, UserId};

use crate::{JwtCodec, Role, TokenError, password};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Result of a uniqueness-guarded account insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Another account already holds this email. Backed by the unique
    /// constraint in Postgres, so racing registrations cannot both land.
    EmailTaken,
}

/// Storage seam for user accounts.
///
/// "Not found" is `Ok(None)` or an outcome variant, never an error.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &User) -> Result<InsertOutcome, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Deliberately the same for unknown email and wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{op} failed")]
    Store {
        op: &'static str,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Password(#[from] password::PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Registration, login, and token issuance.
pub struct AccountService {
    users: Arc<dyn UserStore>,
    jwt: Arc<JwtCodec>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, jwt: Arc<JwtCodec>) -> Self {
        Self { users, jwt }
    }

    /// Register a new account. Fails with `Conflict` on a duplicate email.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AccountError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format").into());
        }
        if password.len() < 8 {
            return Err(DomainError::validation("password must be at least 8 characters").into());
        }

        let existing = self
            .users
            .find_by_email(&email)
            .await
            .map_err(|source| AccountError::Store { op: "user lookup", source })?;
        if existing.is_some() {
            return Err(DomainError::conflict("user already exists").into());
        }

        let user = User {
            id: UserId::new(),
            email,
            password_hash: password::hash(password)?,
            role,
        };

        match self
            .users
            .insert(&user)
            .await
            .map_err(|source| AccountError::Store { op: "user insert", source })?
        {
            InsertOutcome::Inserted => {
                tracing::info!(user_id = %user.id, role = %user.role, "registered user");
                Ok(user)
            }
            // Lost a race with a concurrent registration.
            InsertOutcome::EmailTaken => Err(DomainError::conflict("user already exists").into()),
        }
    }

    /// Verify credentials and issue an access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AccountError> {
        let email = email.trim().to_lowercase();

        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(|source| AccountError::Store { op: "user lookup", source })?
            .ok_or(AccountError::InvalidCredentials)?;

        if !password::verify(password, &user.password_hash)? {
            return Err(AccountError::InvalidCredentials);
        }

        Ok(self.jwt.issue(user.id, user.role, Utc::now())?)
    }

    /// Mint a token for a synthetic user with the requested role.
    ///
    /// Test convenience only: no account row is created.
    pub fn dummy_login(&self, role: Role) -> Result<String, AccountError> {
        Ok(self.jwt.issue(UserId::new(), role, Utc::now())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryUserStore;

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(JwtCodec::new(b"test-secret")),
        )
    }

    #[tokio::test]
    async fn register_then_login() {
        let svc = service();
        let user = svc
            .register("alice@example.com", "supersecretpassword", Role::Moderator)
            .await
            .unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.role, Role::Moderator);

        let token = svc
            .login("alice@example.com", "supersecretpassword")
            .await
            .unwrap();
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn register_normalizes_email() {
        let svc = service();
        svc.register(" Bob@Example.COM ", "supersecretpassword", Role::Employee)
            .await
            .unwrap();

        // Lookup is case/whitespace-insensitive because both paths normalize.
        svc.login("bob@example.com", "supersecretpassword")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let svc = service();
        svc.register("carol@example.com", "supersecretpassword", Role::Employee)
            .await
            .unwrap();

        let err = svc
            .register("carol@example.com", "anotherpassword", Role::Moderator)
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Domain(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn register_rejects_bad_input() {
        let svc = service();

        let err = svc
            .register("not-an-email", "supersecretpassword", Role::Employee)
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Domain(DomainError::Validation(_))));

        let err = svc
            .register("dan@example.com", "short", Role::Employee)
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn racing_registration_is_a_conflict() {
        // A concurrent register can slip in between the duplicate check and
        // the insert; the store's conditional insert reports it and the
        // loser must see the same conflict as an ordinary duplicate.
        struct RacedStore;

        #[async_trait]
        impl UserStore for RacedStore {
            async fn insert(&self, _user: &User) -> Result<InsertOutcome, StoreError> {
                Ok(InsertOutcome::EmailTaken)
            }

            async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
                Ok(None)
            }
        }

        let svc = AccountService::new(
            Arc::new(RacedStore),
            Arc::new(JwtCodec::new(b"test-secret")),
        );

        let err = svc
            .register("frank@example.com", "supersecretpassword", Role::Employee)
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Domain(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let svc = service();
        svc.register("erin@example.com", "supersecretpassword", Role::Employee)
            .await
            .unwrap();

        let unknown = svc.login("nobody@example.com", "whatever").await.unwrap_err();
        let wrong = svc.login("erin@example.com", "wrongpassword").await.unwrap_err();

        assert!(matches!(unknown, AccountError::InvalidCredentials));
        assert!(matches!(wrong, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn dummy_login_carries_requested_role() {
        let svc = service();
        let codec = JwtCodec::new(b"test-secret");

        let token = svc.dummy_login(Role::Moderator).unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.role, Role::Moderator);
    }
}
