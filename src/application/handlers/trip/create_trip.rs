//! CreateTripHandler - Command handler for publishing a new trip.

use std::sync::Arc;

use crate::domain::foundation::ActorHandle;
use crate::domain::trip::{Trip, TripDetails, TripError};
use crate::ports::TripRepository;

/// Command to create a trip.
#[derive(Debug, Clone)]
pub struct CreateTripCommand {
    pub creator: ActorHandle,
    pub details: TripDetails,
}

/// Handler for creating trips. The creator becomes the sole owner.
pub struct CreateTripHandler {
    repository: Arc<dyn TripRepository>,
}

impl CreateTripHandler {
    pub fn new(repository: Arc<dyn TripRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: CreateTripCommand) -> Result<Trip, TripError> {
        cmd.details.validate()?;

        let trip = Trip::create(cmd.creator, cmd.details);
        self.repository.save(&trip).await?;

        tracing::info!(
            trip_id = %trip.id(),
            capacity = trip.details().capacity.seats(),
            "Trip created"
        );

        Ok(trip)
    }
}
