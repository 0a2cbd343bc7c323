//! ModifyTripHandler - Command handler for overwriting a trip's details.
//!
//! All-or-nothing: the trip is locked, the owner checked, the new capacity
//! compared against the current participants, and only then written. Any
//! rejection or persistence failure leaves the stored trip exactly as it was.

use std::sync::Arc;

use crate::domain::foundation::{ActorHandle, AuthorizationGate, TripId};
use crate::domain::trip::{Trip, TripDetails, TripError};
use crate::ports::{with_transaction, TripRepository};

/// Command to modify a trip.
#[derive(Debug, Clone)]
pub struct ModifyTripCommand {
    pub trip_id: TripId,
    pub actor: ActorHandle,
    pub details: TripDetails,
    /// Version the caller edited; `None` skips the staleness check.
    pub expected_version: Option<u64>,
}

pub struct ModifyTripHandler {
    repository: Arc<dyn TripRepository>,
}

impl ModifyTripHandler {
    pub fn new(repository: Arc<dyn TripRepository>) -> Self {
        Self { repository }
    }

    /// # Errors
    ///
    /// - `ValidationFailed` if the new details break a field rule
    /// - `NotFound` if the trip does not exist
    /// - `Forbidden` if the actor is not an owner
    /// - `StaleVersion` if `expected_version` is outdated
    /// - `InvalidCapacity` if capacity drops below the participant count
    /// - `Infrastructure` on persistence failure
    pub async fn handle(&self, cmd: ModifyTripCommand) -> Result<Trip, TripError> {
        cmd.details.validate()?;

        let ModifyTripCommand {
            trip_id,
            actor,
            details,
            expected_version,
        } = cmd;

        let trip = with_transaction(self.repository.as_ref(), move |tx| {
            Box::pin(async move {
                let mut trip = tx
                    .lock(&trip_id)
                    .await?
                    .ok_or(TripError::NotFound(trip_id))?;

                AuthorizationGate::require_owner(&trip, &actor)?;
                trip.revise(details, expected_version)?;

                tx.save(&trip).await?;
                Ok::<_, TripError>(trip)
            })
        })
        .await
        .map_err(|err| {
            if let TripError::Infrastructure(detail) = &err {
                tracing::error!(trip_id = %trip_id, error = %detail, "Trip modification rolled back");
            }
            err
        })?;

        tracing::info!(trip_id = %trip_id, version = trip.version(), "Trip modified");

        Ok(trip)
    }
}
