//! Trip queries: single trip and listing.

use std::sync::Arc;

use crate::domain::foundation::TripId;
use crate::domain::trip::{Trip, TripError};
use crate::ports::TripRepository;

/// Query for a single trip.
#[derive(Debug, Clone)]
pub struct GetTripQuery {
    pub trip_id: TripId,
}

pub struct GetTripHandler {
    repository: Arc<dyn TripRepository>,
}

impl GetTripHandler {
    pub fn new(repository: Arc<dyn TripRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetTripQuery) -> Result<Trip, TripError> {
        self.repository
            .find_by_id(&query.trip_id)
            .await?
            .ok_or(TripError::NotFound(query.trip_id))
    }
}

/// Lists every trip, earliest departure first. No filtering or paging.
pub struct ListTripsHandler {
    repository: Arc<dyn TripRepository>,
}

impl ListTripsHandler {
    pub fn new(repository: Arc<dyn TripRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self) -> Result<Vec<Trip>, TripError> {
        Ok(self.repository.list().await?)
    }
}
