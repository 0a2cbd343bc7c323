//! HTTP routes for trip endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    add_owner, create_trip, delete_trip, get_trip, join_trip, leave_trip, list_trips, modify_trip,
    TripHandlers,
};

/// Creates the trip router with all endpoints.
pub fn trip_routes(handlers: TripHandlers) -> Router {
    Router::new()
        .route("/", post(create_trip).get(list_trips))
        .route("/:id", get(get_trip).post(modify_trip).delete(delete_trip))
        .route("/:id/join", put(join_trip))
        .route("/:id/leave", put(leave_trip))
        .route("/:id/owners", post(add_owner))
        .with_state(handlers)
}
