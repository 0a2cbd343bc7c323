//! HTTP handlers for trip endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{handle_trip_error, ErrorResponse};
use crate::adapters::http::middleware::RequireActor;
use crate::application::handlers::{
    AddOwnerCommand, AddOwnerHandler, CreateTripCommand, CreateTripHandler, DeleteTripCommand,
    DeleteTripHandler, GetTripHandler, GetTripQuery, JoinTripCommand, JoinTripHandler,
    LeaveTripCommand, LeaveTripHandler, ListTripsHandler, ModifyTripCommand, ModifyTripHandler,
};
use crate::domain::foundation::{ActorHandle, ErrorCode, TripId};
use crate::domain::trip::TripError;
use crate::ports::{TripRepository, UserDirectory};

use super::dto::{
    AddOwnerParams, MembershipResponse, TripCommandResponse, TripListResponse, TripRequest,
    TripResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct TripHandlers {
    create_handler: Arc<CreateTripHandler>,
    get_handler: Arc<GetTripHandler>,
    list_handler: Arc<ListTripsHandler>,
    modify_handler: Arc<ModifyTripHandler>,
    delete_handler: Arc<DeleteTripHandler>,
    join_handler: Arc<JoinTripHandler>,
    leave_handler: Arc<LeaveTripHandler>,
    add_owner_handler: Arc<AddOwnerHandler>,
}

impl TripHandlers {
    pub fn new(repository: Arc<dyn TripRepository>, users: Arc<dyn UserDirectory>) -> Self {
        Self {
            create_handler: Arc::new(CreateTripHandler::new(repository.clone())),
            get_handler: Arc::new(GetTripHandler::new(repository.clone())),
            list_handler: Arc::new(ListTripsHandler::new(repository.clone())),
            modify_handler: Arc::new(ModifyTripHandler::new(repository.clone())),
            delete_handler: Arc::new(DeleteTripHandler::new(repository.clone())),
            join_handler: Arc::new(JoinTripHandler::new(repository.clone())),
            leave_handler: Arc::new(LeaveTripHandler::new(repository.clone())),
            add_owner_handler: Arc::new(AddOwnerHandler::new(repository, users)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /trips - Create a trip owned by the caller
pub async fn create_trip(
    State(handlers): State<TripHandlers>,
    RequireActor(actor): RequireActor,
    body: Result<Json<TripRequest>, JsonRejection>,
) -> Response {
    let details = match read_body(body).and_then(|req| Ok(req.into_details()?)) {
        Ok(details) => details,
        Err(e) => return handle_trip_error(e),
    };

    let cmd = CreateTripCommand {
        creator: actor,
        details,
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(trip) => (StatusCode::OK, Json(TripResponse::from(&trip))).into_response(),
        Err(e) => handle_trip_error(e),
    }
}

/// GET /trips - List every trip
pub async fn list_trips(
    State(handlers): State<TripHandlers>,
    RequireActor(_actor): RequireActor,
) -> Response {
    match handlers.list_handler.handle().await {
        Ok(trips) => (StatusCode::OK, Json(TripListResponse::from(trips))).into_response(),
        Err(e) => handle_trip_error(e),
    }
}

/// GET /trips/:id - Get one trip
pub async fn get_trip(
    State(handlers): State<TripHandlers>,
    RequireActor(_actor): RequireActor,
    Path(trip_id): Path<String>,
) -> Response {
    let trip_id = match parse_trip_id(&trip_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get_handler.handle(GetTripQuery { trip_id }).await {
        Ok(trip) => (StatusCode::OK, Json(TripResponse::from(&trip))).into_response(),
        Err(e) => handle_trip_error(e),
    }
}

/// POST /trips/:id - Overwrite the trip's details (owners only)
pub async fn modify_trip(
    State(handlers): State<TripHandlers>,
    RequireActor(actor): RequireActor,
    Path(trip_id): Path<String>,
    body: Result<Json<TripRequest>, JsonRejection>,
) -> Response {
    let trip_id = match parse_trip_id(&trip_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let (details, expected_version) = match read_body(body).and_then(|req| {
        let expected_version = req.expected_version;
        Ok((req.into_details()?, expected_version))
    }) {
        Ok(parts) => parts,
        Err(e) => return handle_trip_error(e),
    };

    let cmd = ModifyTripCommand {
        trip_id,
        actor,
        details,
        expected_version,
    };

    match handlers.modify_handler.handle(cmd).await {
        Ok(trip) => (StatusCode::OK, Json(TripResponse::from(&trip))).into_response(),
        Err(e) => handle_trip_error(e),
    }
}

/// DELETE /trips/:id - Delete the trip (owners only)
pub async fn delete_trip(
    State(handlers): State<TripHandlers>,
    RequireActor(actor): RequireActor,
    Path(trip_id): Path<String>,
) -> Response {
    let trip_id = match parse_trip_id(&trip_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .delete_handler
        .handle(DeleteTripCommand { trip_id, actor })
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(TripCommandResponse::new(&trip_id, "Trip deleted successfully")),
        )
            .into_response(),
        Err(e) => handle_trip_error(e),
    }
}

/// PUT /trips/:id/join - Take a seat
pub async fn join_trip(
    State(handlers): State<TripHandlers>,
    RequireActor(actor): RequireActor,
    Path(trip_id): Path<String>,
) -> Response {
    let trip_id = match parse_trip_id(&trip_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .join_handler
        .handle(JoinTripCommand { trip_id, actor })
        .await
    {
        Ok(result) => (
            StatusCode::OK,
            Json(MembershipResponse::new(&result.trip, result.participant_count)),
        )
            .into_response(),
        Err(e) => handle_trip_error(e),
    }
}

/// PUT /trips/:id/leave - Give up a seat
pub async fn leave_trip(
    State(handlers): State<TripHandlers>,
    RequireActor(actor): RequireActor,
    Path(trip_id): Path<String>,
) -> Response {
    let trip_id = match parse_trip_id(&trip_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .leave_handler
        .handle(LeaveTripCommand { trip_id, actor })
        .await
    {
        Ok(result) => (
            StatusCode::OK,
            Json(MembershipResponse::new(&result.trip, result.participant_count)),
        )
            .into_response(),
        Err(e) => handle_trip_error(e),
    }
}

/// POST /trips/:id/owners?owner={handle} - Add a co-owner (owners only)
pub async fn add_owner(
    State(handlers): State<TripHandlers>,
    RequireActor(actor): RequireActor,
    Path(trip_id): Path<String>,
    Query(params): Query<AddOwnerParams>,
) -> Response {
    let trip_id = match parse_trip_id(&trip_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let target = match ActorHandle::new(params.owner.unwrap_or_default()) {
        Ok(target) => target,
        Err(_) => return handle_trip_error(TripError::validation("owner", "owner is required")),
    };

    let cmd = AddOwnerCommand {
        trip_id,
        acting: actor,
        target,
    };

    match handlers.add_owner_handler.handle(cmd).await {
        Ok(trip) => (StatusCode::OK, Json(TripResponse::from(&trip))).into_response(),
        Err(e) => handle_trip_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

/// An id that cannot name a trip is reported like an absent trip.
fn parse_trip_id(raw: &str) -> Result<TripId, Response> {
    raw.parse::<TripId>().map_err(|_| {
        ErrorResponse::new(ErrorCode::TripNotFound, format!("Trip not found: {}", raw))
            .into_response_with(StatusCode::NOT_FOUND)
    })
}

fn read_body(body: Result<Json<TripRequest>, JsonRejection>) -> Result<TripRequest, TripError> {
    body.map(|Json(req)| req)
        .map_err(|rejection| TripError::validation("body", rejection.body_text()))
}
