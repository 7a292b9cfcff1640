//! Identity provider port.

use crate::identity::domain::{Credential, EmailAddress, User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity provider operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Identity capability consumed by the task lifecycle service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a presented credential to the acting user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidCredential`] when the credential is
    /// unknown or no longer maps to a registered user.
    async fn resolve_actor(&self, credential: &Credential) -> IdentityResult<UserId>;

    /// Returns the user record for `id`, or `None` when no such user exists.
    async fn find_user(&self, id: UserId) -> IdentityResult<Option<User>>;

    /// Returns whether `id` names a registered user.
    async fn user_exists(&self, id: UserId) -> IdentityResult<bool> {
        Ok(self.find_user(id).await?.is_some())
    }

    /// Returns the display name for `id`, or `None` when no such user exists.
    async fn display_name(&self, id: UserId) -> IdentityResult<Option<String>> {
        Ok(self
            .find_user(id)
            .await?
            .map(|user| user.name().as_str().to_owned()))
    }
}

/// Errors returned by identity provider implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// The credential could not be resolved to a user.
    #[error("invalid credential")]
    InvalidCredential,

    /// Another user already registered this email address.
    #[error("email address already registered: {0}")]
    DuplicateEmail(EmailAddress),

    /// Provider backend failure.
    #[error("identity provider error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityError {
    /// Wraps a backend error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
