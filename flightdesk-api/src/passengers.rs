use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use flightdesk_core::models::{DeleteResult, Passenger, PassengerInput, PassengerPatch};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/passenger", get(list_passengers).post(create_passenger))
        .route(
            "/api/v1/passenger/{id}",
            get(get_passenger).put(update_passenger).delete(delete_passenger),
        )
}

async fn list_passengers(State(state): State<AppState>) -> Result<Json<Vec<Passenger>>, AppError> {
    Ok(Json(state.passengers.find_all().await?))
}

async fn get_passenger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Passenger>, AppError> {
    Ok(Json(state.passengers.find_one(id).await?))
}

async fn create_passenger(
    State(state): State<AppState>,
    Json(input): Json<PassengerInput>,
) -> Result<(StatusCode, Json<Passenger>), AppError> {
    let passenger = state.passengers.create(input).await?;
    Ok((StatusCode::CREATED, Json(passenger)))
}

async fn update_passenger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<PassengerPatch>,
) -> Result<Json<Passenger>, AppError> {
    Ok(Json(state.passengers.update(id, patch).await?))
}

async fn delete_passenger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResult>, AppError> {
    Ok(Json(state.passengers.delete(id).await?))
}
