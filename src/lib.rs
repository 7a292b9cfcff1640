//! Taskward: multi-user task tracking with an audited lifecycle.
//!
//! This crate provides the authorization rules and activity audit trail for
//! a multi-user todo service. Users own the tasks they create, may delegate
//! them to one assignee, and every successful mutation is recorded in an
//! append-only activity log.
//!
//! # Architecture
//!
//! Taskward follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`identity`]: Resolved users and the identity provider port
//! - [`task`]: Task lifecycle, authorization policy, and activity log
//! - [`config`]: Service configuration
//! - [`telemetry`]: Tracing subscriber bootstrap

pub mod config;
pub mod identity;
pub mod task;
pub mod telemetry;
