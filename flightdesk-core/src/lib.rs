pub mod memory;
pub mod models;
pub mod passenger;
pub mod repository;
pub mod service;
pub mod weather;

pub use memory::InMemoryStore;
pub use passenger::PassengerRecordService;
pub use repository::{FlightStore, PassengerStore, StoreError};
pub use service::FlightRecordService;
pub use weather::{ForecastDate, Location, UpstreamError, Weather, WeatherLookup};

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },
    #[error(transparent)]
    StoreError(#[from] StoreError),
    #[error(transparent)]
    UpstreamError(#[from] UpstreamError),
}

impl CoreError {
    pub fn flight_not_found(id: Uuid) -> Self {
        CoreError::NotFound { entity: "Flight", id }
    }

    pub fn passenger_not_found(id: Uuid) -> Self {
        CoreError::NotFound { entity: "Passenger", id }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
