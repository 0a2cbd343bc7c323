//! JoinTripHandler - Command handler for taking a seat on a trip.

use std::sync::Arc;

use crate::domain::foundation::{ActorHandle, AuthorizationGate, TripId};
use crate::domain::trip::{Trip, TripError};
use crate::ports::{with_transaction, TripRepository};

/// Command to join a trip.
#[derive(Debug, Clone)]
pub struct JoinTripCommand {
    pub trip_id: TripId,
    pub actor: ActorHandle,
}

/// Result of a successful join.
#[derive(Debug, Clone)]
pub struct JoinTripResult {
    pub trip: Trip,
    pub participant_count: usize,
}

/// Handler for joining trips.
///
/// The capacity check and the insert run under the trip's lock, so two
/// concurrent joins for the last seat cannot both succeed.
pub struct JoinTripHandler {
    repository: Arc<dyn TripRepository>,
}

impl JoinTripHandler {
    pub fn new(repository: Arc<dyn TripRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: JoinTripCommand) -> Result<JoinTripResult, TripError> {
        let JoinTripCommand { trip_id, actor } = cmd;
        let joined_by = actor.clone();

        let (trip, participant_count) = with_transaction(self.repository.as_ref(), move |tx| {
            Box::pin(async move {
                let mut trip = tx
                    .lock(&trip_id)
                    .await?
                    .ok_or(TripError::NotFound(trip_id))?;

                AuthorizationGate::require_non_member(&trip, &actor)?;
                let count = trip.add_participant(actor)?;

                tx.save(&trip).await?;
                Ok::<_, TripError>((trip, count))
            })
        })
        .await?;

        tracing::debug!(
            trip_id = %trip_id,
            actor = %joined_by,
            participant_count,
            "Participant joined trip"
        );

        Ok(JoinTripResult {
            trip,
            participant_count,
        })
    }
}
