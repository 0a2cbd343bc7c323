//! LeaveTripHandler - Command handler for giving up a seat.

use std::sync::Arc;

use crate::domain::foundation::{ActorHandle, AuthorizationGate, TripId};
use crate::domain::trip::{Trip, TripError};
use crate::ports::{with_transaction, TripRepository};

/// Command to leave a trip.
#[derive(Debug, Clone)]
pub struct LeaveTripCommand {
    pub trip_id: TripId,
    pub actor: ActorHandle,
}

/// Result of a successful leave.
#[derive(Debug, Clone)]
pub struct LeaveTripResult {
    pub trip: Trip,
    pub participant_count: usize,
}

pub struct LeaveTripHandler {
    repository: Arc<dyn TripRepository>,
}

impl LeaveTripHandler {
    pub fn new(repository: Arc<dyn TripRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: LeaveTripCommand) -> Result<LeaveTripResult, TripError> {
        let LeaveTripCommand { trip_id, actor } = cmd;
        let left_by = actor.clone();

        let (trip, participant_count) = with_transaction(self.repository.as_ref(), move |tx| {
            Box::pin(async move {
                let mut trip = tx
                    .lock(&trip_id)
                    .await?
                    .ok_or(TripError::NotFound(trip_id))?;

                AuthorizationGate::require_member(&trip, &actor)?;
                let count = trip.remove_participant(&actor)?;

                tx.save(&trip).await?;
                Ok::<_, TripError>((trip, count))
            })
        })
        .await?;

        tracing::debug!(
            trip_id = %trip_id,
            actor = %left_by,
            participant_count,
            "Participant left trip"
        );

        Ok(LeaveTripResult {
            trip,
            participant_count,
        })
    }
}
