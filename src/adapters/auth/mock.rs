//! Mock identity adapters for testing.
//!
//! These adapters implement the `SessionValidator` and `UserDirectory` ports
//! without a real identity provider or database.
//!
//! # Example
//!
//! ```ignore
//! let validator = MockSessionValidator::new().with_test_user("token-alice", "alice");
//! let users = MockUserDirectory::new().with_login("alice").with_login("bob");
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{ActorHandle, AuthError, AuthenticatedUser, DomainError, ErrorCode};
use crate::domain::user::UserProfile;
use crate::ports::{SessionValidator, UserDirectory};

/// Mock session validator for testing.
///
/// Stores a map of tokens to users. Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Optional error to return for all validations
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a valid token for the given login handle.
    ///
    /// Blank handles are ignored.
    pub fn with_test_user(self, token: impl Into<String>, handle: &str) -> Self {
        match ActorHandle::new(handle) {
            Ok(handle) => {
                let display_name = format!("Test User {handle}");
                let user = AuthenticatedUser::new(handle, Some(display_name));
                self.with_user(token, user)
            }
            Err(_) => self,
        }
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self
            .force_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), user);
    }

    /// Removes a token, making it invalid.
    pub fn remove_token(&self, token: &str) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

/// In-memory user directory for testing.
#[derive(Debug, Default)]
pub struct MockUserDirectory {
    users: RwLock<HashMap<ActorHandle, UserProfile>>,
    fail: RwLock<bool>,
}

impl MockUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user.
    pub fn with_user(self, profile: UserProfile) -> Self {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(profile.login.clone(), profile);
        self
    }

    /// Registers a user with placeholder names. Blank logins are ignored.
    pub fn with_login(self, login: &str) -> Self {
        match ActorHandle::new(login) {
            Ok(handle) => {
                let email = format!("{handle}@test.example.com");
                self.with_user(UserProfile::new(handle, login, "", email))
            }
            Err(_) => self,
        }
    }

    /// Makes every lookup fail with a database error.
    pub fn failing(self) -> Self {
        *self.fail.write().unwrap_or_else(PoisonError::into_inner) = true;
        self
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn find_by_login(&self, login: &ActorHandle) -> Result<Option<UserProfile>, DomainError> {
        if *self.fail.read().unwrap_or_else(PoisonError::into_inner) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Simulated directory failure",
            ));
        }
        Ok(self
            .users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(login)
            .cloned())
    }
}
