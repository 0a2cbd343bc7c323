//! Authorization gate and supporting types.
//!
//! The gate is the single place where the caller's identity is resolved and
//! where ownership and membership predicates are evaluated. It is pure: it
//! never touches a repository, it only inspects state that the caller has
//! already loaded.
//!
//! ```text
//! request ─► AuthorizationGate::resolve_actor ─► ActorHandle
//!                                                    │
//!            handler loads trip inside a transaction ▼
//!            AuthorizationGate::require_owner / require_member / require_non_member
//! ```

use super::{
    ActorHandle, AuthenticatedUser, DomainError, ErrorCode, JoinableByActors, OwnedByActors,
};

/// Result of an authorization check.
///
/// Contains both the decision and context for logging/auditing.
#[derive(Debug, Clone)]
pub struct AuthorizationResult {
    /// Whether access was granted.
    pub granted: bool,

    /// The resource type being accessed (e.g., "Trip").
    pub resource_type: &'static str,

    /// The ID of the resource being accessed.
    pub resource_id: String,

    /// The actor who requested access.
    pub actor: String,

    /// Optional reason for denial (if denied).
    pub denial_reason: Option<String>,
}

impl AuthorizationResult {
    /// Creates a successful authorization result.
    pub fn granted(
        resource_type: &'static str,
        resource_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            granted: true,
            resource_type,
            resource_id: resource_id.into(),
            actor: actor.into(),
            denial_reason: None,
        }
    }

    /// Creates a denied authorization result.
    pub fn denied(
        resource_type: &'static str,
        resource_id: impl Into<String>,
        actor: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            granted: false,
            resource_type,
            resource_id: resource_id.into(),
            actor: actor.into(),
            denial_reason: Some(reason.into()),
        }
    }

    /// Converts this result to a `Result<(), DomainError>`.
    ///
    /// Returns `Ok(())` if granted, otherwise an error carrying `code`.
    pub fn into_result(self, code: ErrorCode) -> Result<(), DomainError> {
        if self.granted {
            Ok(())
        } else {
            Err(DomainError::new(
                code,
                self.denial_reason
                    .unwrap_or_else(|| "Access denied".to_string()),
            )
            .with_detail("resource_type", self.resource_type)
            .with_detail("resource_id", self.resource_id)
            .with_detail("actor", self.actor))
        }
    }

    /// Returns true if access was granted.
    pub fn is_granted(&self) -> bool {
        self.granted
    }
}

/// Implemented by aggregates that take part in authorization checks.
pub trait Authorizable {
    /// The type name for authorization logs (e.g., "Trip").
    const RESOURCE_TYPE: &'static str;

    /// Returns a string representation of this resource's ID.
    fn resource_id(&self) -> String;
}

/// Evaluates ownership without raising, for callers that want to log first.
pub fn check_ownership<T>(resource: &T, actor: &ActorHandle) -> AuthorizationResult
where
    T: OwnedByActors + Authorizable,
{
    if resource.is_owner(actor) {
        AuthorizationResult::granted(T::RESOURCE_TYPE, resource.resource_id(), actor.as_str())
    } else {
        AuthorizationResult::denied(
            T::RESOURCE_TYPE,
            resource.resource_id(),
            actor.as_str(),
            format!(
                "{} is not an owner of {} {}",
                actor,
                T::RESOURCE_TYPE,
                resource.resource_id()
            ),
        )
    }
}

/// Stateless gate that resolves actors and enforces predicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationGate;

impl AuthorizationGate {
    /// Resolves the acting user from the identity the provider verified.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if no verified identity is present
    pub fn resolve_actor(identity: Option<&AuthenticatedUser>) -> Result<ActorHandle, DomainError> {
        identity.map(|user| user.handle.clone()).ok_or_else(|| {
            DomainError::new(ErrorCode::Unauthenticated, "Authentication required")
        })
    }

    /// Requires `actor` to be one of the resource's owners.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the actor is not an owner
    pub fn require_owner<T>(resource: &T, actor: &ActorHandle) -> Result<(), DomainError>
    where
        T: OwnedByActors + Authorizable,
    {
        let result = check_ownership(resource, actor);
        if !result.is_granted() {
            tracing::warn!(
                resource_type = result.resource_type,
                resource_id = %result.resource_id,
                actor = %result.actor,
                "ownership check denied"
            );
        }
        result.into_result(ErrorCode::Forbidden)
    }

    /// Requires `actor` to currently hold a seat.
    ///
    /// # Errors
    ///
    /// - `NotAMember` if the actor is not a participant
    pub fn require_member<T>(resource: &T, actor: &ActorHandle) -> Result<(), DomainError>
    where
        T: JoinableByActors + Authorizable,
    {
        if resource.is_participant(actor) {
            Ok(())
        } else {
            AuthorizationResult::denied(
                T::RESOURCE_TYPE,
                resource.resource_id(),
                actor.as_str(),
                "Actor is not a participant",
            )
            .into_result(ErrorCode::NotAMember)
        }
    }

    /// Requires `actor` to not hold a seat yet.
    ///
    /// # Errors
    ///
    /// - `AlreadyMember` if the actor is already a participant
    pub fn require_non_member<T>(resource: &T, actor: &ActorHandle) -> Result<(), DomainError>
    where
        T: JoinableByActors + Authorizable,
    {
        if resource.is_participant(actor) {
            AuthorizationResult::denied(
                T::RESOURCE_TYPE,
                resource.resource_id(),
                actor.as_str(),
                "Actor is already a participant",
            )
            .into_result(ErrorCode::AlreadyMember)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    struct TestResource {
        id: String,
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

    impl Authorizable for TestResource {
        const RESOURCE_TYPE: &'static str = "TestResource";

        fn resource_id(&self) -> String {
            self.id.clone()
        }
    }

    fn actor(handle: &str) -> ActorHandle {
        ActorHandle::new(handle).unwrap()
    }

    fn resource() -> TestResource {
        TestResource {
            id: "res-1".to_string(),
            owners: [actor("alice")].into_iter().collect(),
            participants: [actor("bob")].into_iter().collect(),
        }
    }

    // ============================================================
    // resolve_actor
    // ============================================================

    #[test]
    fn resolve_actor_returns_handle_of_verified_user() {
        let user = AuthenticatedUser::new(actor("alice"), None);
        let handle = AuthorizationGate::resolve_actor(Some(&user)).unwrap();
        assert_eq!(handle.as_str(), "alice");
    }

    #[test]
    fn resolve_actor_fails_without_identity() {
        let err = AuthorizationGate::resolve_actor(None).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    // ============================================================
    // require_owner
    // ============================================================

    #[test]
    fn require_owner_grants_owner() {
        assert!(AuthorizationGate::require_owner(&resource(), &actor("alice")).is_ok());
    }

    #[test]
    fn require_owner_forbids_participant_who_is_not_owner() {
        let err = AuthorizationGate::require_owner(&resource(), &actor("bob")).unwrap_err();

        assert_eq!(err.code, ErrorCode::Forbidden);
        assert_eq!(err.details.get("resource_type"), Some(&"TestResource".to_string()));
        assert_eq!(err.details.get("resource_id"), Some(&"res-1".to_string()));
    }

    // ============================================================
    // membership predicates
    // ============================================================

    #[test]
    fn require_member_accepts_participant() {
        assert!(AuthorizationGate::require_member(&resource(), &actor("bob")).is_ok());
    }

    #[test]
    fn require_member_rejects_outsider() {
        let err = AuthorizationGate::require_member(&resource(), &actor("carol")).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAMember);
    }

    #[test]
    fn require_non_member_rejects_participant() {
        let err = AuthorizationGate::require_non_member(&resource(), &actor("bob")).unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyMember);
    }

    #[test]
    fn require_non_member_accepts_outsider() {
        assert!(AuthorizationGate::require_non_member(&resource(), &actor("carol")).is_ok());
    }

    #[test]
    fn authorization_result_into_result_carries_requested_code() {
        let result = AuthorizationResult::denied("Trip", "t-1", "u-1", "Denied");
        let err = result.into_result(ErrorCode::Forbidden).unwrap_err();

        assert_eq!(err.code, ErrorCode::Forbidden);
        assert_eq!(err.details.get("actor"), Some(&"u-1".to_string()));
    }
}
