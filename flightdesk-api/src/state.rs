use std::sync::Arc;

use flightdesk_core::{
    FlightRecordService, FlightStore, PassengerRecordService, PassengerStore, WeatherLookup,
};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub flights: FlightRecordService,
    pub passengers: PassengerRecordService,
    /// Kept for the health probe
    pub flight_store: Arc<dyn FlightStore>,
}

impl AppState {
    pub fn new(
        flight_store: Arc<dyn FlightStore>,
        passenger_store: Arc<dyn PassengerStore>,
        weather: Arc<dyn WeatherLookup>,
    ) -> Self {
        Self {
            flights: FlightRecordService::new(flight_store.clone(), weather),
            passengers: PassengerRecordService::new(passenger_store),
            flight_store,
        }
    }
}
