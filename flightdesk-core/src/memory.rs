use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Flight, FlightInput, FlightPatch, Passenger, PassengerInput, PassengerPatch, PopulatedFlight,
};
use crate::repository::{FlightStore, PassengerStore, StoreResult};

#[derive(Default)]
struct Collections {
    flights: HashMap<Uuid, Flight>,
    passengers: HashMap<Uuid, Passenger>,
}

impl Collections {
    fn populate(&self, flight: &Flight) -> PopulatedFlight {
        PopulatedFlight {
            id: flight.id,
            pilot: flight.pilot.clone(),
            airplane: flight.airplane.clone(),
            destination_city: flight.destination_city.clone(),
            flight_date: flight.flight_date,
            passengers: flight
                .passengers
                .iter()
                .filter_map(|id| self.passengers.get(id).cloned())
                .collect(),
        }
    }
}

/// Flight and passenger store held in process memory. Every operation takes the
/// lock once, so single-record writes are atomic. Used by the `memory` backend and
/// by tests.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<Collections>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlightStore for InMemoryStore {
    async fn find(&self) -> StoreResult<Vec<PopulatedFlight>> {
        let collections = self.collections.read().await;
        Ok(collections
            .flights
            .values()
            .map(|flight| collections.populate(flight))
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<PopulatedFlight>> {
        let collections = self.collections.read().await;
        Ok(collections
            .flights
            .get(&id)
            .map(|flight| collections.populate(flight)))
    }

    async fn insert(&self, flight: &FlightInput) -> StoreResult<Flight> {
        let record = Flight {
            id: Uuid::new_v4(),
            pilot: flight.pilot.clone(),
            airplane: flight.airplane.clone(),
            destination_city: flight.destination_city.clone(),
            flight_date: flight.flight_date,
            passengers: flight.passengers.clone(),
        };
        self.collections
            .write()
            .await
            .flights
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_by_id(&self, id: Uuid, patch: &FlightPatch) -> StoreResult<Option<Flight>> {
        let mut collections = self.collections.write().await;
        Ok(collections.flights.get_mut(&id).map(|flight| {
            patch.apply_to(flight);
            flight.clone()
        }))
    }

    async fn add_to_set_by_id(
        &self,
        id: Uuid,
        passenger_id: Uuid,
    ) -> StoreResult<Option<PopulatedFlight>> {
        let mut collections = self.collections.write().await;
        let Some(flight) = collections.flights.get_mut(&id) else {
            return Ok(None);
        };
        if !flight.passengers.contains(&passenger_id) {
            flight.passengers.push(passenger_id);
        }
        let flight = flight.clone();
        Ok(Some(collections.populate(&flight)))
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<()> {
        self.collections.write().await.flights.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl PassengerStore for InMemoryStore {
    async fn find(&self) -> StoreResult<Vec<Passenger>> {
        Ok(self
            .collections
            .read()
            .await
            .passengers
            .values()
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Passenger>> {
        Ok(self.collections.read().await.passengers.get(&id).cloned())
    }

    async fn insert(&self, passenger: &PassengerInput) -> StoreResult<Passenger> {
        let record = Passenger {
            id: Uuid::new_v4(),
            name: passenger.name.clone(),
            email: passenger.email.clone(),
        };
        self.collections
            .write()
            .await
            .passengers
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        patch: &PassengerPatch,
    ) -> StoreResult<Option<Passenger>> {
        let mut collections = self.collections.write().await;
        Ok(collections.passengers.get_mut(&id).map(|passenger| {
            patch.apply_to(passenger);
            passenger.clone()
        }))
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<()> {
        self.collections.write().await.passengers.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use flightdesk_shared::Masked;

    fn flight_input(passengers: Vec<Uuid>) -> FlightInput {
        FlightInput {
            pilot: "Amelia".to_string(),
            airplane: "B737".to_string(),
            destination_city: "Lisbon".to_string(),
            flight_date: Utc::now(),
            passengers,
        }
    }

    #[tokio::test]
    async fn test_populate_skips_dangling_references() {
        let store = InMemoryStore::new();
        let passenger = PassengerStore::insert(
            &store,
            &PassengerInput {
                name: "Ada".to_string(),
                email: Masked::from("ada@example.com"),
            },
        )
        .await
        .unwrap();
        let missing = Uuid::new_v4();

        let flight = FlightStore::insert(&store, &flight_input(vec![passenger.id, missing]))
            .await
            .unwrap();
        assert_eq!(flight.passengers.len(), 2);

        let populated = FlightStore::find_by_id(&store, flight.id).await.unwrap().unwrap();
        assert_eq!(populated.passengers, vec![passenger]);
    }

    #[tokio::test]
    async fn test_add_to_set_missing_flight() {
        let store = InMemoryStore::new();
        let result = store.add_to_set_by_id(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = InMemoryStore::new();
        assert!(FlightStore::delete_by_id(&store, Uuid::new_v4()).await.is_ok());
        assert!(PassengerStore::delete_by_id(&store, Uuid::new_v4()).await.is_ok());
    }
}
