use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::models::{DeleteResult, Passenger, PassengerInput, PassengerPatch};
use crate::repository::PassengerStore;
use crate::{CoreError, CoreResult};

/// CRUD over the passengers that flights reference.
#[derive(Clone)]
pub struct PassengerRecordService {
    store: Arc<dyn PassengerStore>,
}

impl PassengerRecordService {
    pub fn new(store: Arc<dyn PassengerStore>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> CoreResult<Vec<Passenger>> {
        Ok(self.store.find().await?)
    }

    pub async fn find_one(&self, id: Uuid) -> CoreResult<Passenger> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::passenger_not_found(id))
    }

    pub async fn create(&self, input: PassengerInput) -> CoreResult<Passenger> {
        input.validate()?;
        let passenger = self.store.insert(&input).await?;
        info!("Passenger created: {} <{}>", passenger.id, passenger.email);
        Ok(passenger)
    }

    pub async fn update(&self, id: Uuid, patch: PassengerPatch) -> CoreResult<Passenger> {
        patch.validate()?;
        self.store
            .update_by_id(id, &patch)
            .await?
            .ok_or_else(|| CoreError::passenger_not_found(id))
    }

    /// Flights keep their references to a deleted passenger; reads just stop
    /// resolving them.
    pub async fn delete(&self, id: Uuid) -> CoreResult<DeleteResult> {
        self.store.delete_by_id(id).await?;
        info!("Passenger deleted: {}", id);
        Ok(DeleteResult::deleted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::models::FlightInput;
    use crate::repository::FlightStore;
    use chrono::Utc;
    use flightdesk_shared::Masked;

    fn ada() -> PassengerInput {
        PassengerInput {
            name: "Ada Lovelace".to_string(),
            email: Masked::from("ada@example.com"),
        }
    }

    #[tokio::test]
    async fn test_passenger_lifecycle() {
        let service = PassengerRecordService::new(Arc::new(InMemoryStore::new()));

        let created = service.create(ada()).await.unwrap();
        assert_eq!(service.find_one(created.id).await.unwrap(), created);

        let patch = PassengerPatch {
            name: Some("Augusta Ada King".to_string()),
            email: None,
        };
        let updated = service.update(created.id, patch).await.unwrap();
        assert_eq!(updated.name, "Augusta Ada King");
        assert_eq!(updated.email.expose(), "ada@example.com");

        assert_eq!(service.delete(created.id).await.unwrap(), DeleteResult::deleted());
        assert!(matches!(
            service.find_one(created.id).await,
            Err(CoreError::NotFound { entity: "Passenger", .. })
        ));
    }

    #[tokio::test]
    async fn test_deleted_passenger_drops_out_of_flight() {
        let store = Arc::new(InMemoryStore::new());
        let service = PassengerRecordService::new(store.clone());
        let passenger = service.create(ada()).await.unwrap();

        let flight = FlightStore::insert(
            store.as_ref(),
            &FlightInput {
                pilot: "Amelia".to_string(),
                airplane: "B737".to_string(),
                destination_city: "Lisbon".to_string(),
                flight_date: Utc::now(),
                passengers: vec![passenger.id],
            },
        )
        .await
        .unwrap();

        service.delete(passenger.id).await.unwrap();

        let populated = FlightStore::find_by_id(store.as_ref(), flight.id).await.unwrap().unwrap();
        assert!(populated.passengers.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let service = PassengerRecordService::new(Arc::new(InMemoryStore::new()));
        let input = PassengerInput {
            name: "Ada".to_string(),
            email: Masked::from("ada.example.com"),
        };
        assert!(matches!(service.create(input).await, Err(CoreError::ValidationError(_))));
    }
}
