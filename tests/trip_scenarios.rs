//! End-to-end trip scenarios through the application handlers.
//!
//! Runs against the in-memory repository, which locks per trip the same way
//! the PostgreSQL adapter does with row locks.

use std::sync::Arc;

use trip_booking::adapters::{InMemoryTripRepository, MockUserDirectory};
use trip_booking::application::{
    AddOwnerCommand, AddOwnerHandler, CreateTripCommand, CreateTripHandler, JoinTripCommand,
    JoinTripHandler, ModifyTripCommand, ModifyTripHandler,
};
use trip_booking::domain::foundation::{
    ActorHandle, AuthenticatedUser, AuthorizationGate, JoinableByActors, OwnedByActors, Timestamp,
    TripId,
};
use trip_booking::domain::trip::{Capacity, Price, Stop, Trip, TripDetails, TripError};
use trip_booking::ports::TripRepository;

// =============================================================================
// Fixtures
// =============================================================================

fn actor(handle: &str) -> ActorHandle {
    ActorHandle::new(handle).unwrap()
}

fn details(capacity: u32) -> TripDetails {
    let departs = Timestamp::now().add_days(30);
    TripDetails {
        name: "Island hopping".to_string(),
        description: "Ferries between the Cyclades".to_string(),
        departure: Stop::new("Piraeus", departs),
        arrival: Stop::new("Naxos", departs.add_hours(6)),
        price: Price::new(210.0).unwrap(),
        capacity: Capacity::new(capacity).unwrap(),
        image: None,
    }
}

async fn create(repo: &Arc<InMemoryTripRepository>, owner: &str, capacity: u32) -> TripId {
    let trip = CreateTripHandler::new(repo.clone())
        .handle(CreateTripCommand {
            creator: actor(owner),
            details: details(capacity),
        })
        .await
        .unwrap();
    *trip.id()
}

async fn join(repo: &Arc<InMemoryTripRepository>, id: TripId, who: &str) -> Result<usize, TripError> {
    JoinTripHandler::new(repo.clone())
        .handle(JoinTripCommand {
            trip_id: id,
            actor: actor(who),
        })
        .await
        .map(|result| result.participant_count)
}

async fn load(repo: &InMemoryTripRepository, id: &TripId) -> Trip {
    repo.find_by_id(id).await.unwrap().unwrap()
}

fn handles(set: &std::collections::BTreeSet<ActorHandle>) -> Vec<&str> {
    set.iter().map(ActorHandle::as_str).collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn joins_stop_at_capacity() {
    let repo = Arc::new(InMemoryTripRepository::new());
    let id = create(&repo, "owner", 2).await;

    assert_eq!(join(&repo, id, "alice").await.unwrap(), 1);
    assert_eq!(handles(load(&repo, &id).await.participants()), ["alice"]);

    assert_eq!(join(&repo, id, "bob").await.unwrap(), 2);
    assert_eq!(handles(load(&repo, &id).await.participants()), ["alice", "bob"]);

    let err = join(&repo, id, "carol").await.unwrap_err();
    assert_eq!(err, TripError::CapacityExceeded { capacity: 2 });
    assert_eq!(handles(load(&repo, &id).await.participants()), ["alice", "bob"]);
}

#[tokio::test]
async fn capacity_cannot_drop_below_participants() {
    let repo = Arc::new(InMemoryTripRepository::new());
    let id = create(&repo, "owner", 5).await;
    join(&repo, id, "a").await.unwrap();
    join(&repo, id, "b").await.unwrap();
    let before = load(&repo, &id).await;

    let err = ModifyTripHandler::new(repo.clone())
        .handle(ModifyTripCommand {
            trip_id: id,
            actor: actor("owner"),
            details: details(1),
            expected_version: None,
        })
        .await
        .unwrap_err();

    assert!(err.is_validation());
    let after = load(&repo, &id).await;
    assert_eq!(after.details().capacity.seats(), 5);
    assert_eq!(after, before);
}

#[tokio::test]
async fn non_owner_cannot_add_owners() {
    let repo = Arc::new(InMemoryTripRepository::new());
    let id = create(&repo, "alice", 3).await;
    let users = Arc::new(
        MockUserDirectory::new()
            .with_login("alice")
            .with_login("bob")
            .with_login("carol"),
    );

    let err = AddOwnerHandler::new(repo.clone(), users)
        .handle(AddOwnerCommand {
            trip_id: id,
            acting: actor("carol"),
            target: actor("bob"),
        })
        .await
        .unwrap_err();

    assert_eq!(err, TripError::Forbidden);
    assert_eq!(handles(load(&repo, &id).await.owners()), ["alice"]);
}

/// Join on behalf of whoever the request identified, as the HTTP layer does.
async fn join_as(
    repo: &Arc<InMemoryTripRepository>,
    id: TripId,
    identity: Option<&AuthenticatedUser>,
) -> Result<(), TripError> {
    let actor = AuthorizationGate::resolve_actor(identity)?;
    JoinTripHandler::new(repo.clone())
        .handle(JoinTripCommand { trip_id: id, actor })
        .await
        .map(|_| ())
}

#[tokio::test]
async fn join_without_identity_leaves_trip_untouched() {
    let repo = Arc::new(InMemoryTripRepository::new());
    let id = create(&repo, "alice", 2).await;
    let before = load(&repo, &id).await;

    let err = join_as(&repo, id, None).await.unwrap_err();

    assert_eq!(err, TripError::Unauthenticated);
    assert_eq!(load(&repo, &id).await, before);

    let bob = AuthenticatedUser::new(actor("bob"), None);
    join_as(&repo, id, Some(&bob)).await.unwrap();
    assert_eq!(handles(load(&repo, &id).await.participants()), ["bob"]);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_joins_for_last_seat_admit_exactly_one() {
    for _ in 0..25 {
        let repo = Arc::new(InMemoryTripRepository::new());
        let id = create(&repo, "owner", 1).await;

        let first = tokio::spawn({
            let repo = repo.clone();
            async move { join(&repo, id, "alice").await }
        });
        let second = tokio::spawn({
            let repo = repo.clone();
            async move { join(&repo, id, "bob").await }
        });

        let results = [first.await.unwrap(), second.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let rejections = results
            .iter()
            .filter(|r| matches!(r, Err(TripError::CapacityExceeded { capacity: 1 })))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(rejections, 1);
        assert_eq!(load(&repo, &id).await.participant_count(), 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_concurrent_joins_never_overbook() {
    let repo = Arc::new(InMemoryTripRepository::new());
    let id = create(&repo, "owner", 5).await;

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move { join(&repo, id, &format!("traveller-{i}")).await })
        })
        .collect();

    let mut admitted = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            admitted += 1;
        }
    }

    let trip = load(&repo, &id).await;
    assert_eq!(admitted, 5);
    assert_eq!(trip.participant_count(), 5);
    assert_eq!(trip.version(), 6);
}
