//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations. Every
//! mutating handler takes an explicit actor resolved at the boundary and
//! runs its load-check-save sequence inside one repository transaction.

pub mod editing;
pub mod membership;
pub mod ownership;
pub mod trip;

#[cfg(test)]
pub(crate) mod testing;

pub use editing::{DeleteTripCommand, DeleteTripHandler, ModifyTripCommand, ModifyTripHandler};
pub use membership::{
    JoinTripCommand, JoinTripHandler, JoinTripResult, LeaveTripCommand, LeaveTripHandler,
    LeaveTripResult,
};
pub use ownership::{AddOwnerCommand, AddOwnerHandler};
pub use trip::{CreateTripCommand, CreateTripHandler, GetTripHandler, GetTripQuery, ListTripsHandler};
