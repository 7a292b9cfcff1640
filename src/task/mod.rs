//! Task ownership, assignment, and activity auditing for taskward.
//!
//! Users create tasks they own, delegate them to other users, and complete
//! or delete them. Every successful mutation appends one entry to an
//! append-only activity log. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Authorization rules in [`policy`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod policy;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
