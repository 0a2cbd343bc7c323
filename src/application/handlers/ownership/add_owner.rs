//! AddOwnerHandler - Command handler for granting co-ownership.

use std::sync::Arc;

use crate::domain::foundation::{ActorHandle, AuthorizationGate, OwnedByActors, TripId};
use crate::domain::trip::{Trip, TripError};
use crate::ports::{with_transaction, TripRepository, UserDirectory};

/// Command to add an owner to a trip.
#[derive(Debug, Clone)]
pub struct AddOwnerCommand {
    pub trip_id: TripId,
    /// Must already own the trip.
    pub acting: ActorHandle,
    /// Must be a registered user.
    pub target: ActorHandle,
}

/// Handler for adding owners. Owners are append-only.
pub struct AddOwnerHandler {
    repository: Arc<dyn TripRepository>,
    users: Arc<dyn UserDirectory>,
}

impl AddOwnerHandler {
    pub fn new(repository: Arc<dyn TripRepository>, users: Arc<dyn UserDirectory>) -> Self {
        Self { repository, users }
    }

    /// The directory lookup runs before the transaction opens, so no store
    /// connection or trip lock is held while it waits. Its result is only
    /// consulted after the ownership check.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the trip does not exist
    /// - `Forbidden` if `acting` is not an owner
    /// - `UserNotFound` if `target` is not registered
    /// - `AlreadyOwner` if `target` already owns the trip
    pub async fn handle(&self, cmd: AddOwnerCommand) -> Result<Trip, TripError> {
        let AddOwnerCommand {
            trip_id,
            acting,
            target,
        } = cmd;

        let registered = self.users.exists(&target).await;

        let trip = with_transaction(self.repository.as_ref(), move |tx| {
            Box::pin(async move {
                let mut trip = tx
                    .lock(&trip_id)
                    .await?
                    .ok_or(TripError::NotFound(trip_id))?;

                AuthorizationGate::require_owner(&trip, &acting)?;

                // Checked after ownership so non-owners learn nothing about who is registered.
                if !registered? {
                    return Err(TripError::UserNotFound(target));
                }

                trip.add_owner(target)?;
                tx.save(&trip).await?;
                Ok::<_, TripError>(trip)
            })
        })
        .await?;

        tracing::info!(trip_id = %trip_id, owners = trip.owners().len(), "Owner added to trip");

        Ok(trip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockUserDirectory;
    use crate::adapters::memory::InMemoryTripRepository;
    use crate::application::handlers::testing::{actor, seeded, stored};
    use crate::domain::foundation::DomainError;
    use crate::domain::user::UserProfile;
    use crate::ports::TripTransaction;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::time::timeout;

    /// Directory that fails if the trip is locked while it is consulted,
    /// the way a pool with no spare connection would.
    struct LockSensitiveDirectory {
        repo: Arc<InMemoryTripRepository>,
        trip_id: TripId,
        inner: MockUserDirectory,
    }

    #[async_trait]
    impl UserDirectory for LockSensitiveDirectory {
        async fn find_by_login(
            &self,
            login: &ActorHandle,
        ) -> Result<Option<UserProfile>, DomainError> {
            let mut tx = self.repo.begin().await?;
            timeout(Duration::from_millis(200), tx.lock(&self.trip_id))
                .await
                .map_err(|_| DomainError::database("Timed out waiting for a connection"))??;
            drop(tx);
            self.inner.find_by_login(login).await
        }
    }

    fn users() -> Arc<MockUserDirectory> {
        Arc::new(
            MockUserDirectory::new()
                .with_login("alice")
                .with_login("bob")
                .with_login("carol"),
        )
    }

    fn add(trip_id: TripId, acting: &str, target: &str) -> AddOwnerCommand {
        AddOwnerCommand {
            trip_id,
            acting: actor(acting),
            target: actor(target),
        }
    }

    #[tokio::test]
    async fn owner_can_add_registered_user() {
        let (repo, id) = seeded("alice", 3, &[]).await;
        let handler = AddOwnerHandler::new(repo.clone(), users());

        let trip = handler.handle(add(id, "alice", "bob")).await.unwrap();

        assert!(trip.is_owner(&actor("bob")));
        assert_eq!(stored(&repo, &id).await.owners().len(), 2);
    }

    #[tokio::test]
    async fn new_owner_can_add_further_owners() {
        let (repo, id) = seeded("alice", 3, &[]).await;
        let handler = AddOwnerHandler::new(repo.clone(), users());

        handler.handle(add(id, "alice", "bob")).await.unwrap();
        handler.handle(add(id, "bob", "carol")).await.unwrap();

        assert_eq!(stored(&repo, &id).await.owners().len(), 3);
    }

    #[tokio::test]
    async fn non_owner_is_forbidden_and_owners_unchanged() {
        let (repo, id) = seeded("alice", 3, &[]).await;
        let handler = AddOwnerHandler::new(repo.clone(), users());

        let err = handler.handle(add(id, "carol", "bob")).await.unwrap_err();

        assert_eq!(err, TripError::Forbidden);
        let owners: Vec<_> = stored(&repo, &id).await.owners().iter().cloned().collect();
        assert_eq!(owners, vec![actor("alice")]);
    }

    #[tokio::test]
    async fn duplicate_owner_is_rejected() {
        let (repo, id) = seeded("alice", 3, &[]).await;
        let handler = AddOwnerHandler::new(repo, users());

        let err = handler.handle(add(id, "alice", "alice")).await.unwrap_err();

        assert_eq!(err, TripError::AlreadyOwner);
    }

    #[tokio::test]
    async fn unknown_user_is_rejected() {
        let (repo, id) = seeded("alice", 3, &[]).await;
        let handler = AddOwnerHandler::new(repo.clone(), users());

        let err = handler.handle(add(id, "alice", "mallory")).await.unwrap_err();

        assert_eq!(err, TripError::UserNotFound(actor("mallory")));
        assert_eq!(stored(&repo, &id).await.owners().len(), 1);
    }

    #[tokio::test]
    async fn missing_trip_fails_not_found() {
        let (repo, _) = seeded("alice", 3, &[]).await;
        let handler = AddOwnerHandler::new(repo, users());
        let missing = TripId::new();

        let err = handler.handle(add(missing, "alice", "bob")).await.unwrap_err();

        assert_eq!(err, TripError::NotFound(missing));
    }

    #[tokio::test]
    async fn directory_failure_is_infrastructure() {
        let (repo, id) = seeded("alice", 3, &[]).await;
        let failing = Arc::new(MockUserDirectory::new().failing());
        let handler = AddOwnerHandler::new(repo, failing);

        let err = handler.handle(add(id, "alice", "bob")).await.unwrap_err();

        assert!(matches!(err, TripError::Infrastructure(_)));
    }

    #[tokio::test]
    async fn user_lookup_happens_outside_the_trip_lock() {
        let (repo, id) = seeded("alice", 3, &[]).await;
        let directory = Arc::new(LockSensitiveDirectory {
            repo: repo.clone(),
            trip_id: id,
            inner: MockUserDirectory::new().with_login("bob"),
        });
        let handler = AddOwnerHandler::new(repo.clone(), directory);

        let trip = handler.handle(add(id, "alice", "bob")).await.unwrap();

        assert!(trip.is_owner(&actor("bob")));
        assert_eq!(stored(&repo, &id).await.owners().len(), 2);
    }

    #[tokio::test]
    async fn directory_failure_does_not_hide_forbidden() {
        let (repo, id) = seeded("alice", 3, &[]).await;
        let failing = Arc::new(MockUserDirectory::new().failing());
        let handler = AddOwnerHandler::new(repo, failing);

        let err = handler.handle(add(id, "carol", "bob")).await.unwrap_err();

        assert_eq!(err, TripError::Forbidden);
    }
}
