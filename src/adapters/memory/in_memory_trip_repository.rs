//! In-memory trip store.
//!
//! Committed trips live in a map behind a `RwLock`. Each trip id has its
//! own `tokio::sync::Mutex`; a transaction holds the owned guard of every
//! trip it locked and stages its writes until commit. Dropping the
//! transaction discards the staged writes and releases the guards.
//!
//! Useful for tests and local development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::foundation::{DomainError, TripId};
use crate::domain::trip::Trip;
use crate::ports::{TripRepository, TripTransaction};

#[derive(Default)]
struct Store {
    trips: RwLock<HashMap<TripId, Trip>>,
    locks: StdMutex<HashMap<TripId, Arc<Mutex<()>>>>,
    fail_commits: AtomicBool,
}

impl Store {
    fn lock_for(&self, id: &TripId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(*id).or_default().clone()
    }

    /// Drop lock entries nobody holds or waits on.
    fn release(&self, ids: impl IntoIterator<Item = TripId>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        for id in ids {
            if locks.get(&id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
                locks.remove(&id);
            }
        }
    }
}

/// In-memory implementation of [`TripRepository`].
#[derive(Clone, Default)]
pub struct InMemoryTripRepository {
    store: Arc<Store>,
}

impl InMemoryTripRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following commit fail with a database error.
    pub fn fail_commits(&self, fail: bool) {
        self.store.fail_commits.store(fail, Ordering::SeqCst);
    }

    #[cfg(test)]
    fn lock_entries(&self) -> usize {
        self.store.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of committed trips.
    pub async fn trip_count(&self) -> usize {
        self.store.trips.read().await.len()
    }
}

#[async_trait]
impl TripRepository for InMemoryTripRepository {
    async fn begin(&self) -> Result<Box<dyn TripTransaction>, DomainError> {
        Ok(Box::new(InMemoryTripTransaction {
            store: Arc::clone(&self.store),
            guards: HashMap::new(),
            staged: HashMap::new(),
        }))
    }

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, DomainError> {
        Ok(self.store.trips.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Trip>, DomainError> {
        let mut trips: Vec<Trip> = self.store.trips.read().await.values().cloned().collect();
        trips.sort_by(|a, b| {
            a.details()
                .departure
                .at
                .cmp(&b.details().departure.at)
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(trips)
    }
}

/// Staged write: `None` means delete.
type Staged = Option<Trip>;

struct InMemoryTripTransaction {
    store: Arc<Store>,
    guards: HashMap<TripId, OwnedMutexGuard<()>>,
    staged: HashMap<TripId, Staged>,
}

impl InMemoryTripTransaction {
    async fn current(&self, id: &TripId) -> Option<Trip> {
        match self.staged.get(id) {
            Some(staged) => staged.clone(),
            None => self.store.trips.read().await.get(id).cloned(),
        }
    }
}

#[async_trait]
impl TripTransaction for InMemoryTripTransaction {
    async fn lock(&mut self, id: &TripId) -> Result<Option<Trip>, DomainError> {
        if !self.guards.contains_key(id) {
            let guard = self.store.lock_for(id).lock_owned().await;
            self.guards.insert(*id, guard);
        }
        Ok(self.current(id).await)
    }

    async fn save(&mut self, trip: &Trip) -> Result<(), DomainError> {
        self.staged.insert(*trip.id(), Some(trip.clone()));
        Ok(())
    }

    async fn delete(&mut self, id: &TripId) -> Result<bool, DomainError> {
        let existed = self.current(id).await.is_some();
        self.staged.insert(*id, None);
        Ok(existed)
    }

    async fn commit(mut self: Box<Self>) -> Result<(), DomainError> {
        if self.store.fail_commits.load(Ordering::SeqCst) {
            return Err(DomainError::database("Simulated commit failure"));
        }

        let staged = std::mem::take(&mut self.staged);
        let mut trips = self.store.trips.write().await;
        for (id, staged) in staged {
            match staged {
                Some(trip) => {
                    trips.insert(id, trip);
                }
                None => {
                    trips.remove(&id);
                }
            }
        }
        // Guards are released on drop, after the writes are visible.
        drop(trips);
        Ok(())
    }
}

impl Drop for InMemoryTripTransaction {
    fn drop(&mut self) {
        let ids: Vec<TripId> = self.guards.keys().copied().collect();
        self.guards.clear();
        self.store.release(ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ActorHandle, Timestamp};
    use crate::domain::trip::{Capacity, Price, Stop, TripDetails};
    use std::time::Duration;

    fn trip_departing_in(days: i64) -> Trip {
        let departs = Timestamp::now().add_days(days);
        Trip::create(
            ActorHandle::new("alice").unwrap(),
            TripDetails {
                name: format!("Trip in {days} days"),
                description: "test".to_string(),
                departure: Stop::new("A", departs),
                arrival: Stop::new("B", departs.add_hours(1)),
                price: Price::free(),
                capacity: Capacity::new(2).unwrap(),
                image: None,
            },
        )
    }

    #[tokio::test]
    async fn committed_writes_are_visible() {
        let repo = InMemoryTripRepository::new();
        let trip = trip_departing_in(1);

        repo.save(&trip).await.unwrap();

        assert_eq!(repo.find_by_id(trip.id()).await.unwrap(), Some(trip));
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        let repo = InMemoryTripRepository::new();
        let trip = trip_departing_in(1);
        repo.save(&trip).await.unwrap();

        {
            let mut tx = repo.begin().await.unwrap();
            let mut locked = tx.lock(trip.id()).await.unwrap().unwrap();
            locked.add_participant(ActorHandle::new("bob").unwrap()).unwrap();
            tx.save(&locked).await.unwrap();
            assert_eq!(tx.lock(trip.id()).await.unwrap().unwrap().participant_count(), 1);
        }

        let stored = repo.find_by_id(trip.id()).await.unwrap().unwrap();
        assert_eq!(stored.participant_count(), 0);
    }

    #[tokio::test]
    async fn failed_commit_keeps_previous_state() {
        let repo = InMemoryTripRepository::new();
        let trip = trip_departing_in(1);
        repo.save(&trip).await.unwrap();
        repo.fail_commits(true);

        let mut tx = repo.begin().await.unwrap();
        tx.delete(trip.id()).await.unwrap();
        assert!(tx.commit().await.is_err());

        repo.fail_commits(false);
        assert_eq!(repo.trip_count().await, 1);
    }

    #[tokio::test]
    async fn delete_reports_whether_trip_existed() {
        let repo = InMemoryTripRepository::new();
        let trip = trip_departing_in(1);
        repo.save(&trip).await.unwrap();

        assert!(repo.delete(trip.id()).await.unwrap());
        assert!(!repo.delete(trip.id()).await.unwrap());
        assert_eq!(repo.trip_count().await, 0);
    }

    #[tokio::test]
    async fn list_orders_by_departure() {
        let repo = InMemoryTripRepository::new();
        let later = trip_departing_in(9);
        let sooner = trip_departing_in(2);
        repo.save(&later).await.unwrap();
        repo.save(&sooner).await.unwrap();

        let ids: Vec<TripId> = repo.list().await.unwrap().iter().map(|t| *t.id()).collect();

        assert_eq!(ids, vec![*sooner.id(), *later.id()]);
    }

    #[tokio::test]
    async fn lock_excludes_second_transaction_on_same_trip() {
        let repo = InMemoryTripRepository::new();
        let trip = trip_departing_in(1);
        repo.save(&trip).await.unwrap();

        let mut first = repo.begin().await.unwrap();
        first.lock(trip.id()).await.unwrap();

        let mut second = repo.begin().await.unwrap();
        let blocked = tokio::time::timeout(Duration::from_millis(50), second.lock(trip.id())).await;
        assert!(blocked.is_err());

        first.commit().await.unwrap();
        let acquired = tokio::time::timeout(Duration::from_secs(1), second.lock(trip.id())).await;
        assert!(acquired.is_ok());
    }

    #[tokio::test]
    async fn different_trips_do_not_contend() {
        let repo = InMemoryTripRepository::new();
        let a = trip_departing_in(1);
        let b = trip_departing_in(2);
        repo.save(&a).await.unwrap();
        repo.save(&b).await.unwrap();

        let mut first = repo.begin().await.unwrap();
        first.lock(a.id()).await.unwrap();

        let mut second = repo.begin().await.unwrap();
        let other = tokio::time::timeout(Duration::from_millis(200), second.lock(b.id())).await;

        assert!(other.unwrap().unwrap().is_some());
    }

    #[tokio::test]
    async fn lock_entries_are_pruned_once_released() {
        let repo = InMemoryTripRepository::new();
        let trip = trip_departing_in(1);
        repo.save(&trip).await.unwrap();

        let mut committed = repo.begin().await.unwrap();
        committed.lock(trip.id()).await.unwrap();
        assert_eq!(repo.lock_entries(), 1);
        committed.commit().await.unwrap();
        assert_eq!(repo.lock_entries(), 0);

        {
            let mut unknown = repo.begin().await.unwrap();
            assert!(unknown.lock(&TripId::new()).await.unwrap().is_none());
        }
        assert_eq!(repo.lock_entries(), 0);

        let mut deleting = repo.begin().await.unwrap();
        deleting.lock(trip.id()).await.unwrap();
        deleting.delete(trip.id()).await.unwrap();
        deleting.commit().await.unwrap();
        assert_eq!(repo.lock_entries(), 0);
    }

    #[tokio::test]
    async fn lock_entry_survives_while_another_transaction_waits() {
        let repo = InMemoryTripRepository::new();
        let trip = trip_departing_in(1);
        repo.save(&trip).await.unwrap();
        let id = *trip.id();

        let mut first = repo.begin().await.unwrap();
        first.lock(&id).await.unwrap();

        let waiter = {
            let repo = repo.clone();
            tokio::spawn(async move {
                let mut second = repo.begin().await.unwrap();
                second.lock(&id).await.unwrap()
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        first.commit().await.unwrap();
        assert!(waiter.await.unwrap().is_some());
        assert_eq!(repo.lock_entries(), 0);
    }
}
