//! HTTP adapter - REST API over the trip handlers.
//!
//! Every route except `/health` sits behind `auth_middleware`; handlers pull
//! the acting user through the `RequireActor` extractor.

pub mod error;
pub mod middleware;
pub mod trip;

use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};

use crate::ports::{SessionValidator, TripRepository, UserDirectory};

pub use error::{handle_trip_error, ErrorResponse};
pub use middleware::{auth_middleware, AuthState, RequireActor};
pub use trip::{trip_routes, TripHandlers};

/// Builds the application router.
///
/// Cross-cutting layers (tracing, timeouts, CORS) are added by the binary.
pub fn app_router(
    repository: Arc<dyn TripRepository>,
    users: Arc<dyn UserDirectory>,
    validator: Arc<dyn SessionValidator>,
) -> Router {
    let handlers = TripHandlers::new(repository, users);
    let auth_state: AuthState = validator;

    Router::new()
        .nest("/trips", trip_routes(handlers))
        .layer(axum::middleware::from_fn_with_state(auth_state, auth_middleware))
        .route("/health", get(health))
}

async fn health() -> StatusCode {
    StatusCode::OK
}
