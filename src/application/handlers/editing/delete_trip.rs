//! DeleteTripHandler - Command handler for removing a trip.

use std::sync::Arc;

use crate::domain::foundation::{ActorHandle, AuthorizationGate, TripId};
use crate::domain::trip::TripError;
use crate::ports::{with_transaction, TripRepository};

/// Command to delete a trip.
#[derive(Debug, Clone)]
pub struct DeleteTripCommand {
    pub trip_id: TripId,
    pub actor: ActorHandle,
}

pub struct DeleteTripHandler {
    repository: Arc<dyn TripRepository>,
}

impl DeleteTripHandler {
    pub fn new(repository: Arc<dyn TripRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeleteTripCommand) -> Result<(), TripError> {
        let DeleteTripCommand { trip_id, actor } = cmd;
        let deleted_by = actor.clone();

        with_transaction(self.repository.as_ref(), move |tx| {
            Box::pin(async move {
                let trip = tx
                    .lock(&trip_id)
                    .await?
                    .ok_or(TripError::NotFound(trip_id))?;

                AuthorizationGate::require_owner(&trip, &actor)?;

                if !tx.delete(&trip_id).await? {
                    return Err(TripError::NotFound(trip_id));
                }
                Ok::<_, TripError>(())
            })
        })
        .await?;

        tracing::info!(trip_id = %trip_id, actor = %deleted_by, "Trip deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{actor, seeded, stored};

    fn delete(trip_id: TripId, who: &str) -> DeleteTripCommand {
        DeleteTripCommand {
            trip_id,
            actor: actor(who),
        }
    }

    #[tokio::test]
    async fn owner_deletes_trip() {
        let (repo, id) = seeded("alice", 3, &["bob"]).await;
        let handler = DeleteTripHandler::new(repo.clone());

        handler.handle(delete(id, "alice")).await.unwrap();

        assert!(repo.find_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn participant_cannot_delete() {
        let (repo, id) = seeded("alice", 3, &["bob"]).await;
        let handler = DeleteTripHandler::new(repo.clone());
        let before = stored(&repo, &id).await;

        let err = handler.handle(delete(id, "bob")).await.unwrap_err();

        assert_eq!(err, TripError::Forbidden);
        assert_eq!(stored(&repo, &id).await, before);
    }

    #[tokio::test]
    async fn deleting_twice_fails_not_found() {
        let (repo, id) = seeded("alice", 3, &[]).await;
        let handler = DeleteTripHandler::new(repo);

        handler.handle(delete(id, "alice")).await.unwrap();
        let err = handler.handle(delete(id, "alice")).await.unwrap_err();

        assert_eq!(err, TripError::NotFound(id));
    }
}
