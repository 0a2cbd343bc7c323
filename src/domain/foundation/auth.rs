//! Authentication types for the domain layer.
//!
//! These types represent a caller whose bearer token has already been
//! verified by the identity provider. They carry **no provider-specific
//! data** - any token scheme can populate them via the `SessionValidator`
//! port.
//!
//! # Example
//!
//! ```ignore
//! // In HTTP middleware, after token validation:
//! let user = AuthenticatedUser::new(ActorHandle::new("alice")?, Some("Alice".to_string()));
//!
//! // Inject into request extensions for handlers to use
//! request.extensions_mut().insert(user);
//! ```

use super::ActorHandle;
use thiserror::Error;

/// Caller identity extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The unique login handle; this is the actor for every trip operation.
    pub handle: ActorHandle,

    /// Display name if the token carried one.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(handle: ActorHandle, display_name: Option<String>) -> Self {
        Self {
            handle,
            display_name,
        }
    }

    /// Returns the display name, or the handle as fallback.
    pub fn display_name_or_handle(&self) -> &str {
        self.display_name
            .as_deref()
            .unwrap_or_else(|| self.handle.as_str())
    }
}

/// Authentication errors that can occur during token validation.
///
/// These errors describe what went wrong from the application's
/// perspective, not the identity provider's.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// The identity provider is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if the caller should obtain a new token.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}
