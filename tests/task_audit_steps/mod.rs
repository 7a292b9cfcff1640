//! Step definitions for task audit behaviour scenarios.

pub mod then;
pub mod when;
