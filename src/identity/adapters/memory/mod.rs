//! In-memory identity adapters.

mod provider;

pub use provider::{InMemoryIdentityProvider, RegisterUserRequest, RegistrationError};
