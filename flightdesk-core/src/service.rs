use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{DeleteResult, EnrichedFlight, Flight, FlightInput, FlightPatch, PopulatedFlight};
use crate::repository::FlightStore;
use crate::weather::{ForecastDate, Location, UpstreamError, Weather, WeatherLookup};
use crate::{CoreError, CoreResult};

/// Flight lifecycle operations and the weather-enriched read path.
///
/// The only component that talks to the [`FlightStore`] and the [`WeatherLookup`].
/// Every call is a single linear sequence of awaits; nothing runs concurrently
/// and nothing is retried or cached.
#[derive(Clone)]
pub struct FlightRecordService {
    store: Arc<dyn FlightStore>,
    weather: Arc<dyn WeatherLookup>,
}

impl FlightRecordService {
    pub fn new(store: Arc<dyn FlightStore>, weather: Arc<dyn WeatherLookup>) -> Self {
        Self { store, weather }
    }

    pub async fn find_all(&self) -> CoreResult<Vec<PopulatedFlight>> {
        Ok(self.store.find().await?)
    }

    /// Reads one flight and attaches the forecast for its destination and day.
    pub async fn find_one(&self, id: Uuid) -> CoreResult<EnrichedFlight> {
        let flight = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::flight_not_found(id))?;

        let location = self.resolve_location(&flight.destination_city).await?;
        let weather = self.resolve_weather(location.woeid, &flight.flight_date).await?;

        Ok(EnrichedFlight::new(flight, weather))
    }

    pub async fn create(&self, input: FlightInput) -> CoreResult<Flight> {
        input.validate()?;
        let flight = self.store.insert(&input.normalized()).await?;
        info!("Flight created: {} -> {}", flight.id, flight.destination_city);
        Ok(flight)
    }

    pub async fn add_passenger(&self, flight_id: Uuid, passenger_id: Uuid) -> CoreResult<PopulatedFlight> {
        let flight = self
            .store
            .add_to_set_by_id(flight_id, passenger_id)
            .await?
            .ok_or_else(|| CoreError::flight_not_found(flight_id))?;
        debug!("Passenger {} on flight {}", passenger_id, flight_id);
        Ok(flight)
    }

    pub async fn update(&self, id: Uuid, patch: FlightPatch) -> CoreResult<Flight> {
        patch.validate()?;
        self.store
            .update_by_id(id, &patch.normalized())
            .await?
            .ok_or_else(|| CoreError::flight_not_found(id))
    }

    /// Deletes without checking existence first; the confirmation is the same
    /// whether or not a record was removed.
    pub async fn delete(&self, id: Uuid) -> CoreResult<DeleteResult> {
        self.store.delete_by_id(id).await?;
        info!("Flight deleted: {}", id);
        Ok(DeleteResult::deleted())
    }

    /// First search hit wins. An empty result is an upstream failure.
    pub(crate) async fn resolve_location(&self, city: &str) -> Result<Location, UpstreamError> {
        debug!("Resolving location for '{}'", city);
        let locations = self.weather.search_location(city).await?;
        locations.into_iter().next().ok_or_else(|| {
            warn!("Location search returned no results for '{}'", city);
            UpstreamError::LocationNotFound(city.to_string())
        })
    }

    pub(crate) async fn resolve_weather(
        &self,
        woeid: i64,
        flight_date: &DateTime<Utc>,
    ) -> Result<Vec<Weather>, UpstreamError> {
        let date = ForecastDate::from_datetime(flight_date);
        debug!("Fetching forecast for woeid {} on {}", woeid, date);
        self.weather.forecast(woeid, &date).await
    }
}
