//! Shared fixtures for handler tests.

use std::sync::Arc;

use crate::adapters::memory::InMemoryTripRepository;
use crate::domain::foundation::{ActorHandle, Timestamp, TripId};
use crate::domain::trip::{Capacity, Price, Stop, Trip, TripDetails};
use crate::ports::TripRepository;

pub fn actor(handle: &str) -> ActorHandle {
    ActorHandle::new(handle).unwrap()
}

pub fn details(capacity: u32) -> TripDetails {
    let departs = Timestamp::now().add_days(10);
    TripDetails {
        name: "Weekend in Porto".to_string(),
        description: "Train, tapas and a boat ride".to_string(),
        departure: Stop::new("Lisbon", departs),
        arrival: Stop::new("Porto", departs.add_hours(3)),
        price: Price::new(89.0).unwrap(),
        capacity: Capacity::new(capacity).unwrap(),
        image: None,
    }
}

/// A repository holding one trip owned by `owner` with the given participants.
pub async fn seeded(
    owner: &str,
    capacity: u32,
    participants: &[&str],
) -> (Arc<InMemoryTripRepository>, TripId) {
    let repo = Arc::new(InMemoryTripRepository::new());
    let mut trip = Trip::create(actor(owner), details(capacity));
    for participant in participants {
        trip.add_participant(actor(participant)).unwrap();
    }
    repo.save(&trip).await.unwrap();
    (repo, *trip.id())
}

pub async fn stored(repo: &InMemoryTripRepository, id: &TripId) -> Trip {
    repo.find_by_id(id).await.unwrap().unwrap()
}
