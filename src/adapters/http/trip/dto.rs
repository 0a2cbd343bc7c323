//! HTTP DTOs for trip endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    JoinableByActors, OwnedByActors, Timestamp, TripId, ValidationError,
};
use crate::domain::trip::{Capacity, Price, Stop, Trip, TripDetails};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Trip fields for create and modify.
///
/// Capacity is signed here so that a negative value becomes a validation
/// error rather than a body rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub name: String,
    pub description: String,
    pub departure: String,
    pub departure_date: DateTime<Utc>,
    pub arrival: String,
    pub arrival_date: DateTime<Utc>,
    pub price: f64,
    pub capacity: i64,
    #[serde(default)]
    pub image: Option<String>,
    /// Version the client edited. Ignored on create.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

impl TripRequest {
    /// Convert into domain details, checking value ranges.
    pub fn into_details(self) -> Result<TripDetails, ValidationError> {
        let seats = u32::try_from(self.capacity).map_err(|_| {
            if self.capacity < 1 {
                ValidationError::below_minimum("capacity", 1, self.capacity)
            } else {
                ValidationError::invalid_format("capacity", "too large")
            }
        })?;

        Ok(TripDetails {
            name: self.name,
            description: self.description,
            departure: Stop::new(self.departure, Timestamp::from_datetime(self.departure_date)),
            arrival: Stop::new(self.arrival, Timestamp::from_datetime(self.arrival_date)),
            price: Price::new(self.price)?,
            capacity: Capacity::new(seats)?,
            image: self.image.filter(|image| !image.trim().is_empty()),
        })
    }
}

/// Query string of `POST /trips/:id/owners`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddOwnerParams {
    #[serde(default)]
    pub owner: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Full trip view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub departure: String,
    pub departure_date: String,
    pub arrival: String,
    pub arrival_date: String,
    pub price: f64,
    pub capacity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub owners: Vec<String>,
    pub participants: Vec<String>,
    pub participant_count: usize,
    pub seats_remaining: usize,
    pub version: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Trip> for TripResponse {
    fn from(trip: &Trip) -> Self {
        let details = trip.details();
        Self {
            id: trip.id().to_string(),
            name: details.name.clone(),
            description: details.description.clone(),
            departure: details.departure.place.clone(),
            departure_date: details.departure.at.as_datetime().to_rfc3339(),
            arrival: details.arrival.place.clone(),
            arrival_date: details.arrival.at.as_datetime().to_rfc3339(),
            price: details.price.amount(),
            capacity: details.capacity.seats(),
            image: details.image.clone(),
            owners: trip.owners().iter().map(ToString::to_string).collect(),
            participants: trip.participants().iter().map(ToString::to_string).collect(),
            participant_count: trip.participant_count(),
            seats_remaining: trip.seats_remaining(),
            version: trip.version(),
            created_at: trip.created_at().as_datetime().to_rfc3339(),
            updated_at: trip.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Trip list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripListResponse {
    pub items: Vec<TripResponse>,
    pub total: usize,
}

impl From<Vec<Trip>> for TripListResponse {
    fn from(trips: Vec<Trip>) -> Self {
        let items: Vec<TripResponse> = trips.iter().map(TripResponse::from).collect();
        Self {
            total: items.len(),
            items,
        }
    }
}

/// Outcome of join and leave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipResponse {
    pub trip_id: String,
    pub participant_count: usize,
    pub seats_remaining: usize,
}

impl MembershipResponse {
    pub fn new(trip: &Trip, participant_count: usize) -> Self {
        Self {
            trip_id: trip.id().to_string(),
            participant_count,
            seats_remaining: trip.seats_remaining(),
        }
    }
}

/// Response for commands without a trip body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripCommandResponse {
    pub trip_id: String,
    pub message: String,
}

impl TripCommandResponse {
    pub fn new(trip_id: &TripId, message: impl Into<String>) -> Self {
        Self {
            trip_id: trip_id.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ActorHandle;
    use chrono::Duration;

    fn request() -> TripRequest {
        let departs = Utc::now() + Duration::days(2);
        TripRequest {
            name: "Fjords".to_string(),
            description: "Ferry north".to_string(),
            departure: "Bergen".to_string(),
            departure_date: departs,
            arrival: "Alesund".to_string(),
            arrival_date: departs + Duration::hours(10),
            price: 150.0,
            capacity: 12,
            image: Some(" ".to_string()),
            expected_version: None,
        }
    }

    #[test]
    fn request_converts_to_details() {
        let details = request().into_details().unwrap();

        assert_eq!(details.capacity.seats(), 12);
        assert_eq!(details.departure.place, "Bergen");
        assert!(details.image.is_none());
    }

    #[test]
    fn negative_or_zero_capacity_is_rejected() {
        let mut negative = request();
        negative.capacity = -3;
        let mut zero = request();
        zero.capacity = 0;

        assert_eq!(negative.into_details().unwrap_err().field(), "capacity");
        assert_eq!(zero.into_details().unwrap_err().field(), "capacity");
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut req = request();
        req.price = -1.0;

        assert_eq!(req.into_details().unwrap_err().field(), "price");
    }

    #[test]
    fn response_exposes_membership_state() {
        let mut trip = Trip::create(
            ActorHandle::new("alice").unwrap(),
            request().into_details().unwrap(),
        );
        trip.add_participant(ActorHandle::new("bob").unwrap()).unwrap();

        let response = TripResponse::from(&trip);

        assert_eq!(response.owners, vec!["alice".to_string()]);
        assert_eq!(response.participants, vec!["bob".to_string()]);
        assert_eq!(response.participant_count, 1);
        assert_eq!(response.seats_remaining, 11);
        assert_eq!(response.version, 2);
    }
}
