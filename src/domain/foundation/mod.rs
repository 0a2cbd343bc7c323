//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors, authentication types and the
//! authorization gate that form the vocabulary of the trip booking domain.

mod auth;
mod authorization;
mod errors;
mod ids;
mod ownership;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use authorization::{check_ownership, Authorizable, AuthorizationGate, AuthorizationResult};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ActorHandle, TripId};
pub use ownership::{JoinableByActors, OwnedByActors};
pub use timestamp::Timestamp;
