//! Trip aggregate entity.
//!
//! A trip is a capacity-limited bookable event. It is either absent or fully
//! present; every mutation goes through the methods below so that the
//! invariants hold after each committed operation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{TripDetails, TripError};
use crate::domain::foundation::{
    ActorHandle, Authorizable, JoinableByActors, OwnedByActors, Timestamp, TripId,
};

/// Trip aggregate.
///
/// # Invariants
///
/// - `participants.len() <= details.capacity`
/// - `owners` is never empty (owners are append-only)
/// - `owners` and `participants` are sets, so no handle appears twice
/// - `version` increases by one with every mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    id: TripId,
    details: TripDetails,
    owners: BTreeSet<ActorHandle>,
    participants: BTreeSet<ActorHandle>,
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Trip {
    /// Create a new trip. The creator becomes its sole owner.
    pub fn create(creator: ActorHandle, details: TripDetails) -> Self {
        let now = Timestamp::now();
        Self {
            id: TripId::new(),
            details,
            owners: BTreeSet::from([creator]),
            participants: BTreeSet::new(),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute a trip from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: TripId,
        details: TripDetails,
        owners: BTreeSet<ActorHandle>,
        participants: BTreeSet<ActorHandle>,
        version: u64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            details,
            owners,
            participants,
            version,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &TripId {
        &self.id
    }

    pub fn details(&self) -> &TripDetails {
        &self.details
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Seats still available.
    pub fn seats_remaining(&self) -> usize {
        self.details
            .capacity
            .as_usize()
            .saturating_sub(self.participants.len())
    }

    pub fn is_full(&self) -> bool {
        self.seats_remaining() == 0
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Give `actor` a seat and return the new participant count.
    ///
    /// # Errors
    ///
    /// - `AlreadyMember` if the actor already holds a seat
    /// - `CapacityExceeded` if every seat is taken
    pub fn add_participant(&mut self, actor: ActorHandle) -> Result<usize, TripError> {
        if self.participants.contains(&actor) {
            return Err(TripError::AlreadyMember);
        }
        if self.is_full() {
            return Err(TripError::CapacityExceeded {
                capacity: self.details.capacity.seats(),
            });
        }

        self.participants.insert(actor);
        self.touch();
        Ok(self.participants.len())
    }

    /// Release the seat held by `actor` and return the new participant count.
    ///
    /// # Errors
    ///
    /// - `NotAMember` if the actor holds no seat
    pub fn remove_participant(&mut self, actor: &ActorHandle) -> Result<usize, TripError> {
        if !self.participants.remove(actor) {
            return Err(TripError::NotAMember);
        }
        self.touch();
        Ok(self.participants.len())
    }

    /// Append `target` to the owners.
    ///
    /// # Errors
    ///
    /// - `AlreadyOwner` if the target already owns the trip
    pub fn add_owner(&mut self, target: ActorHandle) -> Result<(), TripError> {
        if !self.owners.insert(target) {
            return Err(TripError::AlreadyOwner);
        }
        self.touch();
        Ok(())
    }

    /// Overwrite every descriptive field.
    ///
    /// When `expected_version` is given it must equal the current version.
    /// On error the trip is left untouched.
    ///
    /// # Errors
    ///
    /// - `StaleVersion` if the caller edited an outdated copy
    /// - `InvalidCapacity` if the new capacity cannot hold the current participants
    pub fn revise(
        &mut self,
        details: TripDetails,
        expected_version: Option<u64>,
    ) -> Result<(), TripError> {
        if let Some(expected) = expected_version {
            if expected != self.version {
                return Err(TripError::StaleVersion {
                    expected,
                    actual: self.version,
                });
            }
        }

        if details.capacity.as_usize() < self.participants.len() {
            return Err(TripError::InvalidCapacity {
                requested: details.capacity.seats(),
                participants: self.participants.len(),
            });
        }

        self.details = details;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Timestamp::now();
    }
}

impl OwnedByActors for Trip {
    fn owners(&self) -> &BTreeSet<ActorHandle> {
        &self.owners
    }
}

impl JoinableByActors for Trip {
    fn participants(&self) -> &BTreeSet<ActorHandle> {
        &self.participants
    }
}

impl Authorizable for Trip {
    const RESOURCE_TYPE: &'static str = "Trip";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}
