//! User directory port - lookup of registered users by login handle.

use async_trait::async_trait;

use crate::domain::foundation::{ActorHandle, DomainError};
use crate::domain::user::UserProfile;

/// Read-only access to registered users.
///
/// Used when an operation names a user other than the caller, such as
/// adding a co-owner.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by login handle.
    ///
    /// Returns `None` if no such user is registered.
    async fn find_by_login(&self, login: &ActorHandle) -> Result<Option<UserProfile>, DomainError>;

    /// Check whether a user is registered.
    async fn exists(&self, login: &ActorHandle) -> Result<bool, DomainError> {
        Ok(self.find_by_login(login).await?.is_some())
    }
}
