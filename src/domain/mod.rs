//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, auth, authorization gate)
//! - `trip` - Trip aggregate, its value objects and invariants
//! - `user` - Read-only view of registered users

pub mod foundation;
pub mod trip;
pub mod user;
