//! Ownership and membership traits for shared resources.
//!
//! A trip can have several owners and several participants, so instead of a
//! single `owner_id()` these traits expose the full actor sets. Handlers and
//! the `AuthorizationGate` only depend on the traits, never on the concrete
//! aggregate.
//!
//! # Example
//!
//! ```ignore
//! impl OwnedByActors for Trip {
//!     fn owners(&self) -> &BTreeSet<ActorHandle> {
//!         &self.owners
//!     }
//! }
//!
//! AuthorizationGate::require_owner(&trip, &actor)?;
//! ```

use std::collections::BTreeSet;

use super::ActorHandle;

/// Trait for aggregates controlled by one or more owners.
pub trait OwnedByActors {
    /// Returns every actor allowed to mutate this resource.
    fn owners(&self) -> &BTreeSet<ActorHandle>;

    /// Checks if the given actor is one of the owners.
    fn is_owner(&self, actor: &ActorHandle) -> bool {
        self.owners().contains(actor)
    }
}

/// Trait for aggregates that actors can join as participants.
pub trait JoinableByActors {
    /// Returns every actor currently holding a seat.
    fn participants(&self) -> &BTreeSet<ActorHandle>;

    /// Checks if the given actor currently participates.
    fn is_participant(&self, actor: &ActorHandle) -> bool {
        self.participants().contains(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestResource {
        owners: BTreeSet<ActorHandle>,
        participants: BTreeSet<ActorHandle>,
    }

    impl OwnedByActors for TestResource {
        fn owners(&self) -> &BTreeSet<ActorHandle> {
            &self.owners
        }
    }

    impl JoinableByActors for TestResource {
        fn participants(&self) -> &BTreeSet<ActorHandle> {
            &self.participants
        }
    }

    fn actor(handle: &str) -> ActorHandle {
        ActorHandle::new(handle).unwrap()
    }

    fn resource() -> TestResource {
        TestResource {
            owners: [actor("alice"), actor("bob")].into_iter().collect(),
            participants: [actor("carol")].into_iter().collect(),
        }
    }

    #[test]
    fn every_co_owner_is_an_owner() {
        let resource = resource();
        assert!(resource.is_owner(&actor("alice")));
        assert!(resource.is_owner(&actor("bob")));
        assert!(!resource.is_owner(&actor("mallory")));
    }

    #[test]
    fn participation_is_independent_of_ownership() {
        let resource = resource();
        assert!(resource.is_participant(&actor("carol")));
        assert!(!resource.is_participant(&actor("alice")));
        assert!(!resource.is_owner(&actor("carol")));
    }
}
