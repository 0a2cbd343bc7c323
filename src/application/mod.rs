//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (write) are separated from query handlers (read).

pub mod handlers;

pub use handlers::{
    AddOwnerCommand, AddOwnerHandler, CreateTripCommand, CreateTripHandler, DeleteTripCommand,
    DeleteTripHandler, GetTripHandler, GetTripQuery, JoinTripCommand, JoinTripHandler,
    JoinTripResult, LeaveTripCommand, LeaveTripHandler, LeaveTripResult, ListTripsHandler,
    ModifyTripCommand, ModifyTripHandler,
};
