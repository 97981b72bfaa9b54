//! Artist identity and the signed-in session.
//!
//! The session is a plain service object handed to the screens that
//! need it. Nothing here is global; tests construct as many sessions
//! as they like.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use inkar_core::{ArtistId, Error, Result};

/// The signed-in artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Account ID, shared with tattoo record attribution.
    pub id: ArtistId,
    /// Name shown in the UI and stamped on uploads.
    pub display_name: String,
}

/// Credential backend.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Authenticates an existing account.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Creates an account and signs it in.
    async fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<AuthUser>;

    /// Invalidates the provider-side session, if any.
    async fn sign_out(&self) -> Result<()>;
}

/// In-memory identity provider for tests and local development.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
}

struct Account {
    password: String,
    user: AuthUser,
}

impl MemoryIdentityProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account without going through `sign_up`.
    ///
    /// # Panics
    ///
    /// Panics if the account lock is poisoned. Test-path only.
    pub fn seed_account(&self, email: &str, password: &str, user: AuthUser) {
        self.accounts
            .write()
            .expect("account lock poisoned")
            .insert(
                email.to_string(),
                Account {
                    password: password.to_string(),
                    user,
                },
            );
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| Error::internal("account lock poisoned"))?;
        let account = accounts
            .get(email)
            .filter(|account| account.password == password)
            .ok_or_else(|| Error::auth("invalid email or password"))?;
        Ok(account.user.clone())
    }

    async fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<AuthUser> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(Error::InvalidInput("email address is invalid".to_string()));
        }
        if password.len() < 6 {
            return Err(Error::InvalidInput(
                "password must be at least 6 characters".to_string(),
            ));
        }

        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| Error::internal("account lock poisoned"))?;
        if accounts.contains_key(email) {
            return Err(Error::auth("account already exists"));
        }

        let user = AuthUser {
            id: ArtistId::generate(),
            display_name: display_name.to_string(),
        };
        accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        Ok(())
    }
}

/// The app's view of who is signed in.
///
/// Owned by the UI layer; all mutation happens on its thread.
pub struct ArtistSession {
    provider: Arc<dyn IdentityProvider>,
    current: Option<AuthUser>,
}

impl ArtistSession {
    /// Creates a signed-out session over the given provider.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            current: None,
        }
    }

    /// Signs in and records the user.
    ///
    /// # Errors
    ///
    /// Returns `Error::Auth` on bad credentials; the session stays in
    /// its previous state.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<&AuthUser> {
        let user = self.provider.sign_in(email, password).await?;
        tracing::info!(artist = %user.id, "signed in");
        Ok(self.current.insert(user))
    }

    /// Creates an account and signs it in.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for malformed credentials or
    /// `Error::Auth` when the account already exists.
    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<&AuthUser> {
        let user = self.provider.sign_up(email, password, display_name).await?;
        tracing::info!(artist = %user.id, "account created");
        Ok(self.current.insert(user))
    }

    /// Signs out. Clears the local user even if the provider call
    /// fails; a stuck remote session must not trap the UI.
    pub async fn sign_out(&mut self) {
        if let Err(err) = self.provider.sign_out().await {
            tracing::warn!(error = %err, "provider sign-out failed");
        }
        self.current = None;
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&AuthUser> {
        self.current.as_ref()
    }

    /// The signed-in user, or an auth error for gated operations.
    ///
    /// # Errors
    ///
    /// Returns `Error::Auth` when no one is signed in.
    pub fn require_user(&self) -> Result<&AuthUser> {
        self.current
            .as_ref()
            .ok_or_else(|| Error::auth("sign in required"))
    }
}
