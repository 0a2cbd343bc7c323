//! Trip lifecycle handlers: create, get, list.

mod create_trip;
mod get_trip;

pub use create_trip::{CreateTripCommand, CreateTripHandler};
pub use get_trip::{GetTripHandler, GetTripQuery, ListTripsHandler};
