use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use flightdesk_core::models::{
    DeleteResult, EnrichedFlight, Flight, FlightInput, FlightPatch, PopulatedFlight,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/flight", get(list_flights).post(create_flight))
        .route(
            "/api/v1/flight/{id}",
            get(get_flight).put(update_flight).delete(delete_flight),
        )
        .route(
            "/api/v1/flight/{flight_id}/passenger/{passenger_id}",
            post(add_passenger),
        )
}

/// GET /api/v1/flight
async fn list_flights(State(state): State<AppState>) -> Result<Json<Vec<PopulatedFlight>>, AppError> {
    Ok(Json(state.flights.find_all().await?))
}

/// GET /api/v1/flight/{id}
/// Flight with passengers and the forecast for its destination on the flight day
async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrichedFlight>, AppError> {
    Ok(Json(state.flights.find_one(id).await?))
}

/// POST /api/v1/flight
async fn create_flight(
    State(state): State<AppState>,
    Json(input): Json<FlightInput>,
) -> Result<(StatusCode, Json<Flight>), AppError> {
    let flight = state.flights.create(input).await?;
    Ok((StatusCode::CREATED, Json(flight)))
}

/// PUT /api/v1/flight/{id}
async fn update_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<FlightPatch>,
) -> Result<Json<Flight>, AppError> {
    Ok(Json(state.flights.update(id, patch).await?))
}

/// DELETE /api/v1/flight/{id}
async fn delete_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResult>, AppError> {
    Ok(Json(state.flights.delete(id).await?))
}

/// POST /api/v1/flight/{flight_id}/passenger/{passenger_id}
async fn add_passenger(
    State(state): State<AppState>,
    Path((flight_id, passenger_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PopulatedFlight>, AppError> {
    Ok(Json(state.flights.add_passenger(flight_id, passenger_id).await?))
}
