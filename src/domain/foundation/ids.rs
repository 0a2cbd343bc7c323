//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(Uuid);

impl TripId {
    /// Creates a new random TripId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a TripId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TripId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TripId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Login handle of an authenticated user, as supplied by the identity provider.
///
/// Handles are opaque and unique. They are ordered so that owner and
/// participant sets have a stable iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorHandle(String);

impl ActorHandle {
    /// Creates a new ActorHandle, returning error if empty or blank.
    pub fn new(handle: impl Into<String>) -> Result<Self, ValidationError> {
        let handle = handle.into();
        if handle.trim().is_empty() {
            return Err(ValidationError::empty_field("actor_handle"));
        }
        Ok(Self(handle))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ActorHandle {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActorHandle> for String {
    fn from(handle: ActorHandle) -> Self {
        handle.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_id_generates_unique_values() {
        let a = TripId::new();
        let b = TripId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn trip_id_parses_from_display_output() {
        let id = TripId::new();
        let parsed: TripId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn trip_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<TripId>().is_err());
    }

    #[test]
    fn actor_handle_rejects_blank_values() {
        assert!(ActorHandle::new("").is_err());
        assert!(ActorHandle::new("   ").is_err());
    }

    #[test]
    fn actor_handle_deserializes_through_validation() {
        let ok: ActorHandle = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(ok.as_str(), "alice");

        let err = serde_json::from_str::<ActorHandle>("\"\"");
        assert!(err.is_err());
    }
}
