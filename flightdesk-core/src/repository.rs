use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Flight, FlightInput, FlightPatch, Passenger, PassengerInput, PassengerPatch, PopulatedFlight,
};

/// Persistence failure, tagged with the store operation that raised it.
#[derive(Debug, thiserror::Error)]
#[error("Store operation `{operation}` failed: {source}")]
pub struct StoreError {
    pub operation: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl StoreError {
    pub fn new(
        operation: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository trait for flight records.
///
/// Reads that return [`PopulatedFlight`] resolve passenger references to full
/// records. Single-record writes are atomic per flight.
#[async_trait]
pub trait FlightStore: Send + Sync {
    async fn find(&self) -> StoreResult<Vec<PopulatedFlight>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<PopulatedFlight>>;

    async fn insert(&self, flight: &FlightInput) -> StoreResult<Flight>;

    /// Returns the record as it is after the update, or `None` if it does not exist.
    async fn update_by_id(&self, id: Uuid, patch: &FlightPatch) -> StoreResult<Option<Flight>>;

    /// Adds `passenger_id` to the passenger set unless already present.
    async fn add_to_set_by_id(
        &self,
        id: Uuid,
        passenger_id: Uuid,
    ) -> StoreResult<Option<PopulatedFlight>>;

    /// Removes the record if present. Deleting a missing id is not an error.
    async fn delete_by_id(&self, id: Uuid) -> StoreResult<()>;

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Repository trait for passenger records
#[async_trait]
pub trait PassengerStore: Send + Sync {
    async fn find(&self) -> StoreResult<Vec<Passenger>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Passenger>>;

    async fn insert(&self, passenger: &PassengerInput) -> StoreResult<Passenger>;

    async fn update_by_id(
        &self,
        id: Uuid,
        patch: &PassengerPatch,
    ) -> StoreResult<Option<Passenger>>;

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<()>;
}
