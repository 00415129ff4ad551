use async_trait::async_trait;
use flightdesk_core::models::{Passenger, PassengerInput, PassengerPatch};
use flightdesk_core::repository::{PassengerStore, StoreError, StoreResult};
use flightdesk_shared::Masked;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostgresPassengerStore {
    pool: PgPool,
}

impl PostgresPassengerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PassengerRow {
    id: Uuid,
    name: String,
    email: String,
}

impl From<PassengerRow> for Passenger {
    fn from(row: PassengerRow) -> Self {
        Passenger {
            id: row.id,
            name: row.name,
            email: Masked::new(row.email),
        }
    }
}

#[async_trait]
impl PassengerStore for PostgresPassengerStore {
    async fn find(&self) -> StoreResult<Vec<Passenger>> {
        let rows = sqlx::query_as::<_, PassengerRow>("SELECT id, name, email FROM passengers")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::new("find_passengers", e))?;

        Ok(rows.into_iter().map(Passenger::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Passenger>> {
        let row = sqlx::query_as::<_, PassengerRow>(
            "SELECT id, name, email FROM passengers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::new("find_passenger_by_id", e))?;

        Ok(row.map(Passenger::from))
    }

    async fn insert(&self, passenger: &PassengerInput) -> StoreResult<Passenger> {
        let row = sqlx::query_as::<_, PassengerRow>(
            "INSERT INTO passengers (id, name, email) VALUES ($1, $2, $3) RETURNING id, name, email",
        )
        .bind(Uuid::new_v4())
        .bind(&passenger.name)
        .bind(passenger.email.expose())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::new("insert_passenger", e))?;

        Ok(row.into())
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        patch: &PassengerPatch,
    ) -> StoreResult<Option<Passenger>> {
        let row = sqlx::query_as::<_, PassengerRow>(
            r#"
            UPDATE passengers SET
                name = COALESCE($2, name),
                email = COALESCE($3, email)
            WHERE id = $1
            RETURNING id, name, email
            "#,
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.email.as_ref().map(|email| email.expose().as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::new("update_passenger_by_id", e))?;

        Ok(row.map(Passenger::from))
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("DELETE FROM passengers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::new("delete_passenger_by_id", e))?;
        Ok(())
    }
}
