//! Domain model for user identity.

mod error;
mod ids;
mod user;

pub use error::IdentityDomainError;
pub use ids::{Credential, UserId};
pub use user::{EmailAddress, User, UserName};
