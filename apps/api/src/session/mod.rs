//! Session context restored from local key-value storage.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::user::User;
use store::{KeyValueStore, StoreError};

pub mod handlers;
pub mod store;

pub const TOKEN_KEY: &str = "authToken";
pub const EMAIL_KEY: &str = "authUserEmail";

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
}

impl SessionState {
    fn authenticated(email: &str, token: &str) -> Self {
        Self {
            is_authenticated: true,
            user: Some(User::from_email(email)),
            token: Some(token.to_string()),
        }
    }
}

/// Session context. Only [`SessionContext::initialize`] constructs one, so every
/// holder sees state that was restored from the store first.
pub struct SessionContext {
    store: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
}

impl SessionContext {
    pub async fn initialize(store: Arc<dyn KeyValueStore>) -> Result<Self, StoreError> {
        let token = store.get(TOKEN_KEY).await?;
        let email = store.get(EMAIL_KEY).await?;

        let state = match (token, email) {
            (Some(token), Some(email)) => {
                info!(email = %email, "Restored session from store");
                SessionState::authenticated(&email, &token)
            }
            _ => SessionState::default(),
        };

        Ok(Self {
            store,
            state: RwLock::new(state),
        })
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    /// Persists both keys or neither: if the email write fails, the previous token is put back.
    pub async fn login(&self, email: &str, token: &str) -> Result<SessionState, StoreError> {
        let mut state = self.state.write().await;
        let previous_token = self.store.get(TOKEN_KEY).await?;
        self.store.set(TOKEN_KEY, token).await?;
        if let Err(e) = self.store.set(EMAIL_KEY, email).await {
            self.restore_token(previous_token.as_deref()).await;
            return Err(e);
        }
        *state = SessionState::authenticated(email, token);
        info!(email = %email, "Logged in");
        Ok(state.clone())
    }

    /// Behaves exactly like [`SessionContext::login`].
    pub async fn signup(&self, email: &str, token: &str) -> Result<SessionState, StoreError> {
        self.login(email, token).await
    }

    /// Removing the token ends the session; a restore needs both keys, so an email left
    /// behind by a failed second removal is only logged.
    pub async fn logout(&self) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        self.store.remove(TOKEN_KEY).await?;
        *state = SessionState::default();
        if let Err(e) = self.store.remove(EMAIL_KEY).await {
            warn!("Stale session email left in store: {e}");
        }
        info!("Logged out");
        Ok(())
    }

    async fn restore_token(&self, previous: Option<&str>) {
        let restored = match previous {
            Some(token) => self.store.set(TOKEN_KEY, token).await,
            None => self.store.remove(TOKEN_KEY).await,
        };
        if let Err(e) = restored {
            warn!("Failed to roll back session token: {e}");
        }
    }
}

/// Opaque bearer token for a new session.
pub fn issue_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Email and password are required.")]
    Missing,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters long.")]
    PasswordTooShort,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Only checked on signup.
    pub confirm_password: Option<String>,
}

impl Credentials {
    /// Checks run in the order the auth form reports them.
    pub fn validate(&self, signup: bool) -> Result<(), CredentialError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(CredentialError::Missing);
        }
        if !self.email.contains('@') {
            return Err(CredentialError::InvalidEmail);
        }
        if signup && self.confirm_password.as_deref() != Some(self.password.as_str()) {
            return Err(CredentialError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CredentialError::PasswordTooShort);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::store::MemoryStore;
    use super::*;

    fn creds(email: &str, password: &str, confirm: Option<&str>) -> Credentials {
        Credentials {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_fresh_store_is_unauthenticated() {
        let session = SessionContext::initialize(Arc::new(MemoryStore::new()))
            .await
            .unwrap();
        assert_eq!(session.snapshot().await, SessionState::default());
    }

    #[tokio::test]
    async fn test_login_survives_reinitialization() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let session = SessionContext::initialize(store.clone()).await.unwrap();
        session.login("ada@example.com", "tok-1").await.unwrap();

        let restored = SessionContext::initialize(store).await.unwrap().snapshot().await;
        assert!(restored.is_authenticated);
        assert_eq!(restored.token.as_deref(), Some("tok-1"));
        assert_eq!(restored.user, Some(User::from_email("ada@example.com")));
    }

    #[tokio::test]
    async fn test_partial_store_is_unauthenticated() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "tok").await.unwrap();
        let session = SessionContext::initialize(store).await.unwrap();
        assert!(!session.snapshot().await.is_authenticated);
    }

    #[tokio::test]
    async fn test_logout_clears_store_and_state() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let session = SessionContext::initialize(store.clone()).await.unwrap();
        session.signup("ada@example.com", "tok").await.unwrap();
        session.logout().await.unwrap();

        assert_eq!(session.snapshot().await, SessionState::default());
        assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
        assert_eq!(store.get(EMAIL_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_signup_matches_login() {
        let a = SessionContext::initialize(Arc::new(MemoryStore::new())).await.unwrap();
        let b = SessionContext::initialize(Arc::new(MemoryStore::new())).await.unwrap();
        assert_eq!(
            a.login("x@y.z", "t").await.unwrap(),
            b.signup("x@y.z", "t").await.unwrap()
        );
    }

    /// Memory store whose writes to or removals of one key fail.
    struct FailingKey {
        inner: MemoryStore,
        key: &'static str,
    }

    #[async_trait::async_trait]
    impl KeyValueStore for FailingKey {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if key == self.key {
                return Err(std::io::Error::other("disk full").into());
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StoreError> {
            if key == self.key {
                return Err(std::io::Error::other("disk full").into());
            }
            self.inner.remove(key).await
        }
    }

    #[tokio::test]
    async fn test_failed_login_keeps_previous_session() {
        let inner = MemoryStore::new();
        inner.set(TOKEN_KEY, "tok-a").await.unwrap();
        inner.set(EMAIL_KEY, "a@example.com").await.unwrap();
        let store: Arc<dyn KeyValueStore> = Arc::new(FailingKey {
            inner,
            key: EMAIL_KEY,
        });

        let session = SessionContext::initialize(store.clone()).await.unwrap();
        let before = session.snapshot().await;
        assert!(session.login("b@example.com", "tok-b").await.is_err());

        assert_eq!(session.snapshot().await, before);
        assert_eq!(store.get(TOKEN_KEY).await.unwrap().as_deref(), Some("tok-a"));
        assert_eq!(
            store.get(EMAIL_KEY).await.unwrap().as_deref(),
            Some("a@example.com")
        );
    }

    #[tokio::test]
    async fn test_failed_first_login_leaves_no_token() {
        let store: Arc<dyn KeyValueStore> = Arc::new(FailingKey {
            inner: MemoryStore::new(),
            key: EMAIL_KEY,
        });
        let session = SessionContext::initialize(store.clone()).await.unwrap();
        assert!(session.login("b@example.com", "tok-b").await.is_err());
        assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
        assert!(!session.snapshot().await.is_authenticated);
    }

    #[tokio::test]
    async fn test_logout_survives_stale_email() {
        let inner = MemoryStore::new();
        inner.set(TOKEN_KEY, "tok").await.unwrap();
        inner.set(EMAIL_KEY, "a@example.com").await.unwrap();
        let store: Arc<dyn KeyValueStore> = Arc::new(FailingKey {
            inner,
            key: EMAIL_KEY,
        });

        let session = SessionContext::initialize(store.clone()).await.unwrap();
        session.logout().await.unwrap();

        assert!(!session.snapshot().await.is_authenticated);
        let restored = SessionContext::initialize(store).await.unwrap();
        assert!(!restored.snapshot().await.is_authenticated);
    }

    #[test]
    fn test_credential_checks_in_order() {
        assert_eq!(creds("", "secret1", None).validate(false), Err(CredentialError::Missing));
        assert_eq!(
            creds("not-an-email", "x", None).validate(false),
            Err(CredentialError::InvalidEmail)
        );
        assert_eq!(
            creds("a@b.c", "secret1", Some("secret2")).validate(true),
            Err(CredentialError::PasswordMismatch)
        );
        assert_eq!(
            creds("a@b.c", "short", Some("short")).validate(true),
            Err(CredentialError::PasswordTooShort)
        );
        assert_eq!(creds("a@b.c", "secret1", None).validate(false), Ok(()));
        assert_eq!(creds("a@b.c", "secret1", Some("secret1")).validate(true), Ok(()));
    }

    #[test]
    fn test_issued_tokens_are_unique() {
        assert_ne!(issue_token(), issue_token());
    }
}
