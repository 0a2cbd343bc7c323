//! Trip repository port and its unit of work.
//!
//! Every mutation of a trip follows the same shape: begin a transaction,
//! lock the trip, modify it in memory, save, commit. Locking gives
//! per-trip serialization: two transactions that lock the same trip run one
//! after the other, transactions on different trips never wait for each
//! other.
//!
//! # Rollback
//!
//! A [`TripTransaction`] that is dropped without [`TripTransaction::commit`]
//! rolls back. That covers domain rejections (`?` returns early), panics, and
//! request cancellation (the handler future is dropped mid-flight).
//!
//! # Example
//!
//! ```ignore
//! let count = with_transaction(repo.as_ref(), move |tx| {
//!     Box::pin(async move {
//!         let mut trip = tx.lock(&trip_id).await?.ok_or(TripError::NotFound(trip_id))?;
//!         let count = trip.add_participant(actor)?;
//!         tx.save(&trip).await?;
//!         Ok(count)
//!     })
//! })
//! .await?;
//! ```

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::domain::foundation::{DomainError, TripId};
use crate::domain::trip::{Trip, TripError};

/// Repository port for Trip aggregate persistence.
///
/// Implementations must guarantee that [`TripTransaction::lock`] excludes
/// every other transaction locking the same trip until commit or rollback.
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Start a unit of work.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` if no connection could be acquired
    async fn begin(&self) -> Result<Box<dyn TripTransaction>, DomainError>;

    /// Find a trip by its ID without locking it.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, DomainError>;

    /// All trips, earliest departure first.
    async fn list(&self) -> Result<Vec<Trip>, DomainError>;

    /// Insert or update a trip in its own transaction.
    async fn save(&self, trip: &Trip) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        tx.save(trip).await?;
        tx.commit().await
    }

    /// Delete a trip in its own transaction. Returns false if it did not exist.
    async fn delete(&self, id: &TripId) -> Result<bool, DomainError> {
        let mut tx = self.begin().await?;
        let deleted = tx.delete(id).await?;
        tx.commit().await?;
        Ok(deleted)
    }
}

/// A single unit of work against the trip store.
#[async_trait]
pub trait TripTransaction: Send {
    /// Load a trip and hold an exclusive lock on it until this transaction
    /// ends. Reads see this transaction's own staged writes.
    ///
    /// Returns `None` if not found.
    async fn lock(&mut self, id: &TripId) -> Result<Option<Trip>, DomainError>;

    /// Stage an insert-or-update.
    async fn save(&mut self, trip: &Trip) -> Result<(), DomainError>;

    /// Stage a delete. Returns false if the trip did not exist.
    async fn delete(&mut self, id: &TripId) -> Result<bool, DomainError>;

    /// Make every staged write visible atomically and release the locks.
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}

/// Run `work` inside a transaction scope.
///
/// Commits when `work` returns `Ok`, rolls back when it returns `Err`. The
/// closure may only capture owned data because the future it returns
/// borrows the transaction.
///
/// # Errors
///
/// Whatever `work` returns, plus `Infrastructure` for begin/commit failures.
pub async fn with_transaction<R, F>(
    repository: &dyn TripRepository,
    work: F,
) -> Result<R, TripError>
where
    R: Send,
    F: for<'t> FnOnce(&'t mut dyn TripTransaction) -> BoxFuture<'t, Result<R, TripError>> + Send,
{
    let mut tx = repository.begin().await?;
    let value = work(&mut *tx).await?;
    tx.commit().await?;
    Ok(value)
}
