//! Read-only user profile.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ActorHandle;

/// Profile fields of a registered user.
///
/// Carries no credential material; the password hash never leaves the
/// identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub login: ActorHandle,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl UserProfile {
    pub fn new(
        login: ActorHandle,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            login,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// "First Last", or the login when both names are blank.
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.login.to_string()
        } else {
            name.to_string()
        }
    }
}
