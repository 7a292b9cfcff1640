//! Port contracts consumed by the task core for identity lookups.

pub mod provider;

pub use provider::{IdentityError, IdentityProvider, IdentityResult};
