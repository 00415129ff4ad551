use async_trait::async_trait;
use chrono::{DateTime, Utc};
use flightdesk_core::models::{Flight, FlightInput, FlightPatch, Passenger, PopulatedFlight};
use flightdesk_core::repository::{FlightStore, StoreError, StoreResult};
use flightdesk_shared::Masked;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

pub struct PostgresFlightStore {
    pool: PgPool,
}

impl PostgresFlightStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct FlightRow {
    id: Uuid,
    pilot: String,
    airplane: String,
    destination_city: String,
    flight_date: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct PassengerRefRow {
    passenger_id: Uuid,
}

#[derive(sqlx::FromRow)]
struct PopulatedPassengerRow {
    flight_id: Uuid,
    id: Uuid,
    name: String,
    email: String,
}

impl FlightRow {
    fn into_flight(self, passengers: Vec<Uuid>) -> Flight {
        Flight {
            id: self.id,
            pilot: self.pilot,
            airplane: self.airplane,
            destination_city: self.destination_city,
            flight_date: self.flight_date,
            passengers,
        }
    }

    fn into_populated(self, passengers: Vec<Passenger>) -> PopulatedFlight {
        PopulatedFlight {
            id: self.id,
            pilot: self.pilot,
            airplane: self.airplane,
            destination_city: self.destination_city,
            flight_date: self.flight_date,
            passengers,
        }
    }
}

impl From<PopulatedPassengerRow> for Passenger {
    fn from(row: PopulatedPassengerRow) -> Self {
        Passenger {
            id: row.id,
            name: row.name,
            email: Masked::new(row.email),
        }
    }
}

fn store_err(operation: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| StoreError::new(operation, e)
}

const POPULATED_PASSENGERS: &str = r#"
    SELECT fp.flight_id, p.id, p.name, p.email
    FROM flight_passengers fp
    JOIN passengers p ON p.id = fp.passenger_id
    WHERE fp.flight_id = ANY($1)
    ORDER BY fp.position
"#;

impl PostgresFlightStore {
    /// Resolves passenger references for a batch of flights in one query.
    async fn populate(&self, rows: Vec<FlightRow>, operation: &'static str) -> StoreResult<Vec<PopulatedFlight>> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

        let passenger_rows = sqlx::query_as::<_, PopulatedPassengerRow>(POPULATED_PASSENGERS)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(store_err(operation))?;

        let mut by_flight: HashMap<Uuid, Vec<Passenger>> = HashMap::new();
        for row in passenger_rows {
            by_flight.entry(row.flight_id).or_default().push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let passengers = by_flight.remove(&row.id).unwrap_or_default();
                row.into_populated(passengers)
            })
            .collect())
    }

    async fn passenger_refs(
        tx: &mut Transaction<'_, Postgres>,
        flight_id: Uuid,
        operation: &'static str,
    ) -> StoreResult<Vec<Uuid>> {
        let rows = sqlx::query_as::<_, PassengerRefRow>(
            "SELECT passenger_id FROM flight_passengers WHERE flight_id = $1 ORDER BY position",
        )
        .bind(flight_id)
        .fetch_all(&mut **tx)
        .await
        .map_err(store_err(operation))?;

        Ok(rows.into_iter().map(|row| row.passenger_id).collect())
    }

    async fn insert_refs(
        tx: &mut Transaction<'_, Postgres>,
        flight_id: Uuid,
        passengers: &[Uuid],
        operation: &'static str,
    ) -> StoreResult<()> {
        if passengers.is_empty() {
            return Ok(());
        }

        // WITH ORDINALITY keeps the caller's order in the position sequence
        sqlx::query(
            r#"
            INSERT INTO flight_passengers (flight_id, passenger_id)
            SELECT $1, refs.passenger_id
            FROM UNNEST($2::uuid[]) WITH ORDINALITY AS refs(passenger_id, ord)
            ORDER BY refs.ord
            ON CONFLICT (flight_id, passenger_id) DO NOTHING
            "#,
        )
        .bind(flight_id)
        .bind(passengers)
        .execute(&mut **tx)
        .await
        .map_err(store_err(operation))?;

        Ok(())
    }
}

#[async_trait]
impl FlightStore for PostgresFlightStore {
    async fn find(&self) -> StoreResult<Vec<PopulatedFlight>> {
        let rows = sqlx::query_as::<_, FlightRow>(
            "SELECT id, pilot, airplane, destination_city, flight_date FROM flights",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("find"))?;

        self.populate(rows, "find").await
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<PopulatedFlight>> {
        let row = sqlx::query_as::<_, FlightRow>(
            "SELECT id, pilot, airplane, destination_city, flight_date FROM flights WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err("find_by_id"))?;

        match row {
            Some(row) => Ok(self.populate(vec![row], "find_by_id").await?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn insert(&self, flight: &FlightInput) -> StoreResult<Flight> {
        let mut tx = self.pool.begin().await.map_err(store_err("insert"))?;

        let row = sqlx::query_as::<_, FlightRow>(
            r#"
            INSERT INTO flights (id, pilot, airplane, destination_city, flight_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, pilot, airplane, destination_city, flight_date
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&flight.pilot)
        .bind(&flight.airplane)
        .bind(&flight.destination_city)
        .bind(flight.flight_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(store_err("insert"))?;

        Self::insert_refs(&mut tx, row.id, &flight.passengers, "insert").await?;
        let passengers = Self::passenger_refs(&mut tx, row.id, "insert").await?;

        tx.commit().await.map_err(store_err("insert"))?;
        Ok(row.into_flight(passengers))
    }

    async fn update_by_id(&self, id: Uuid, patch: &FlightPatch) -> StoreResult<Option<Flight>> {
        let mut tx = self.pool.begin().await.map_err(store_err("update_by_id"))?;

        let row = sqlx::query_as::<_, FlightRow>(
            r#"
            UPDATE flights SET
                pilot = COALESCE($2, pilot),
                airplane = COALESCE($3, airplane),
                destination_city = COALESCE($4, destination_city),
                flight_date = COALESCE($5, flight_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, pilot, airplane, destination_city, flight_date
            "#,
        )
        .bind(id)
        .bind(patch.pilot.as_deref())
        .bind(patch.airplane.as_deref())
        .bind(patch.destination_city.as_deref())
        .bind(patch.flight_date)
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_err("update_by_id"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        if let Some(passengers) = &patch.passengers {
            sqlx::query("DELETE FROM flight_passengers WHERE flight_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(store_err("update_by_id"))?;
            Self::insert_refs(&mut tx, id, passengers, "update_by_id").await?;
        }
        let passengers = Self::passenger_refs(&mut tx, id, "update_by_id").await?;

        tx.commit().await.map_err(store_err("update_by_id"))?;
        Ok(Some(row.into_flight(passengers)))
    }

    async fn add_to_set_by_id(
        &self,
        id: Uuid,
        passenger_id: Uuid,
    ) -> StoreResult<Option<PopulatedFlight>> {
        // Selecting from flights makes the insert a no-op for unknown flight ids
        sqlx::query(
            r#"
            INSERT INTO flight_passengers (flight_id, passenger_id)
            SELECT id, $2 FROM flights WHERE id = $1
            ON CONFLICT (flight_id, passenger_id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(passenger_id)
        .execute(&self.pool)
        .await
        .map_err(store_err("add_to_set_by_id"))?;

        self.find_by_id(id).await
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("DELETE FROM flights WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_err("delete_by_id"))?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(store_err("ping"))?;
        Ok(())
    }
}
