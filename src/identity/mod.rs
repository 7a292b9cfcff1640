//! User identity for taskward.
//!
//! The task core never authenticates anyone itself: it consumes resolved
//! [`domain::UserId`] values and asks the [`ports::IdentityProvider`] whether
//! a user exists and how to name them in audit entries. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
