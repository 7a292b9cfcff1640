//! In-memory identity provider with registration and opaque credentials.

use async_trait::async_trait;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use uuid::Uuid;

use crate::identity::{
    domain::{Credential, EmailAddress, IdentityDomainError, User, UserId, UserName},
    ports::{IdentityError, IdentityProvider, IdentityResult},
};

/// Request payload for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    name: String,
    email: String,
}

impl RegisterUserRequest {
    /// Creates a registration request.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Errors returned while registering a user.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Field validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),
    /// The provider rejected the registration.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Thread-safe in-memory identity provider.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityProvider {
    state: Arc<RwLock<InMemoryIdentityState>>,
}

#[derive(Debug, Default)]
struct InMemoryIdentityState {
    users: HashMap<UserId, User>,
    email_index: HashMap<EmailAddress, UserId>,
    credentials: HashMap<String, UserId>,
}

fn poisoned(err: impl std::fmt::Display) -> IdentityError {
    IdentityError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryIdentityProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new user with a unique email address.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::Domain`] for an empty name or malformed
    /// email, and [`IdentityError::DuplicateEmail`] when the address is taken.
    pub fn register(
        &self,
        request: RegisterUserRequest,
        clock: &impl Clock,
    ) -> Result<User, RegistrationError> {
        let name = UserName::new(request.name)?;
        let email = EmailAddress::new(request.email)?;

        let mut state = self.state.write().map_err(poisoned)?;
        if state.email_index.contains_key(&email) {
            return Err(IdentityError::DuplicateEmail(email).into());
        }

        let user = User::new(name, email, clock);
        state.email_index.insert(user.email().clone(), user.id());
        state.users.insert(user.id(), user.clone());
        Ok(user)
    }

    /// Issues a fresh opaque credential for a registered user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidCredential`] when the user is unknown.
    pub fn issue_credential(&self, user_id: UserId) -> IdentityResult<Credential> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.users.contains_key(&user_id) {
            return Err(IdentityError::InvalidCredential);
        }
        let token = Uuid::new_v4().simple().to_string();
        state.credentials.insert(token.clone(), user_id);
        Ok(Credential::new(token))
    }

    /// Revokes a previously issued credential.
    ///
    /// Returns `false` when the credential was unknown or already revoked.
    /// Other credentials of the same user stay valid.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Persistence`] when the state lock is poisoned.
    pub fn revoke_credential(&self, credential: &Credential) -> IdentityResult<bool> {
        let mut state = self.state.write().map_err(poisoned)?;
        Ok(state.credentials.remove(credential.as_str()).is_some())
    }

    /// Looks up a user by email address.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Persistence`] when the state lock is poisoned.
    pub fn find_by_email(&self, email: &EmailAddress) -> IdentityResult<Option<User>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .email_index
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn resolve_actor(&self, credential: &Credential) -> IdentityResult<UserId> {
        let state = self.state.read().map_err(poisoned)?;
        state
            .credentials
            .get(credential.as_str())
            .copied()
            .filter(|id| state.users.contains_key(id))
            .ok_or(IdentityError::InvalidCredential)
    }

    async fn find_user(&self, id: UserId) -> IdentityResult<Option<User>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.users.get(&id).cloned())
    }
}
