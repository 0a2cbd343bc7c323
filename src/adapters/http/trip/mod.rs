//! HTTP adapter for trip endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AddOwnerParams, MembershipResponse, TripCommandResponse, TripListResponse, TripRequest,
    TripResponse,
};
pub use handlers::TripHandlers;
pub use routes::trip_routes;
