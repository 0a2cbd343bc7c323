//! PostgreSQL implementation of TripRepository.
//!
//! A trip is one `trips` row plus its rows in `trip_owners` and
//! `trip_participants`. Locking uses `SELECT ... FOR UPDATE` on the trip row,
//! so transactions touching the same trip queue on the row lock while other
//! trips are unaffected.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::foundation::{
    ActorHandle, DomainError, ErrorCode, JoinableByActors, OwnedByActors, Timestamp, TripId,
};
use crate::domain::trip::{Capacity, Price, Stop, Trip, TripDetails};
use crate::ports::{TripRepository, TripTransaction};

const SELECT_TRIP: &str = r#"
    SELECT id, name, description, departure_place, departure_at, arrival_place,
           arrival_at, price, capacity, image, version, created_at, updated_at
    FROM trips
"#;

/// PostgreSQL implementation of the TripRepository port.
#[derive(Clone)]
pub struct PostgresTripRepository {
    pool: PgPool,
}

impl PostgresTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn acquire(&self) -> Result<sqlx::pool::PoolConnection<Postgres>, DomainError> {
        self.pool
            .acquire()
            .await
            .map_err(|e| db_error("Failed to acquire connection", e))
    }
}

#[async_trait]
impl TripRepository for PostgresTripRepository {
    async fn begin(&self) -> Result<Box<dyn TripTransaction>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;
        Ok(Box::new(PostgresTripTransaction { tx }))
    }

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, DomainError> {
        let mut conn = self.acquire().await?;
        let query = format!("{SELECT_TRIP} WHERE id = $1");
        let row: Option<TripRow> = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| db_error("Failed to fetch trip", e))?;

        match row {
            Some(row) => Ok(Some(hydrate_one(&mut conn, row).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Trip>, DomainError> {
        let mut conn = self.acquire().await?;
        let query = format!("{SELECT_TRIP} ORDER BY departure_at, id");
        let rows: Vec<TripRow> = sqlx::query_as(&query)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| db_error("Failed to list trips", e))?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut owners = load_members(&mut conn, MemberTable::Owners, &ids).await?;
        let mut participants = load_members(&mut conn, MemberTable::Participants, &ids).await?;

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                row.into_trip(
                    owners.remove(&id).unwrap_or_default(),
                    participants.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }
}

/// A single PostgreSQL transaction. Rolls back when dropped uncommitted.
struct PostgresTripTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl TripTransaction for PostgresTripTransaction {
    async fn lock(&mut self, id: &TripId) -> Result<Option<Trip>, DomainError> {
        let query = format!("{SELECT_TRIP} WHERE id = $1 FOR UPDATE");
        let row: Option<TripRow> = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| db_error("Failed to lock trip", e))?;

        match row {
            Some(row) => Ok(Some(hydrate_one(&mut self.tx, row).await?)),
            None => Ok(None),
        }
    }

    async fn save(&mut self, trip: &Trip) -> Result<(), DomainError> {
        let details = trip.details();
        let capacity = i32::try_from(details.capacity.seats())
            .map_err(|_| DomainError::database("Capacity out of range for storage"))?;
        let version = i64::try_from(trip.version())
            .map_err(|_| DomainError::database("Version out of range for storage"))?;

        sqlx::query(
            r#"
            INSERT INTO trips (
                id, name, description, departure_place, departure_at, arrival_place,
                arrival_at, price, capacity, image, version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                departure_place = EXCLUDED.departure_place,
                departure_at = EXCLUDED.departure_at,
                arrival_place = EXCLUDED.arrival_place,
                arrival_at = EXCLUDED.arrival_at,
                price = EXCLUDED.price,
                capacity = EXCLUDED.capacity,
                image = EXCLUDED.image,
                version = EXCLUDED.version,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(trip.id().as_uuid())
        .bind(&details.name)
        .bind(&details.description)
        .bind(&details.departure.place)
        .bind(details.departure.at.as_datetime())
        .bind(&details.arrival.place)
        .bind(details.arrival.at.as_datetime())
        .bind(details.price.amount())
        .bind(capacity)
        .bind(&details.image)
        .bind(version)
        .bind(trip.created_at().as_datetime())
        .bind(trip.updated_at().as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| db_error("Failed to save trip", e))?;

        replace_members(&mut self.tx, MemberTable::Owners, trip.id(), trip.owners()).await?;
        replace_members(
            &mut self.tx,
            MemberTable::Participants,
            trip.id(),
            trip.participants(),
        )
        .await?;

        Ok(())
    }

    async fn delete(&mut self, id: &TripId) -> Result<bool, DomainError> {
        // Member rows go with ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| db_error("Failed to delete trip", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| db_error("Failed to commit transaction", e))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Row mapping
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, sqlx::FromRow)]
struct TripRow {
    id: Uuid,
    name: String,
    description: String,
    departure_place: String,
    departure_at: DateTime<Utc>,
    arrival_place: String,
    arrival_at: DateTime<Utc>,
    price: f64,
    capacity: i32,
    image: Option<String>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TripRow {
    fn into_trip(
        self,
        owners: BTreeSet<ActorHandle>,
        participants: BTreeSet<ActorHandle>,
    ) -> Result<Trip, DomainError> {
        let capacity = u32::try_from(self.capacity)
            .ok()
            .and_then(|seats| Capacity::new(seats).ok())
            .ok_or_else(|| corrupt("capacity", self.capacity))?;
        let price = Price::new(self.price).map_err(|_| corrupt("price", self.price))?;
        let version = u64::try_from(self.version).map_err(|_| corrupt("version", self.version))?;

        let details = TripDetails {
            name: self.name,
            description: self.description,
            departure: Stop::new(self.departure_place, Timestamp::from_datetime(self.departure_at)),
            arrival: Stop::new(self.arrival_place, Timestamp::from_datetime(self.arrival_at)),
            price,
            capacity,
            image: self.image,
        };

        Ok(Trip::reconstitute(
            TripId::from_uuid(self.id),
            details,
            owners,
            participants,
            version,
            Timestamp::from_datetime(self.created_at),
            Timestamp::from_datetime(self.updated_at),
        ))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    trip_id: Uuid,
    login: String,
}

#[derive(Debug, Clone, Copy)]
enum MemberTable {
    Owners,
    Participants,
}

impl MemberTable {
    fn name(self) -> &'static str {
        match self {
            MemberTable::Owners => "trip_owners",
            MemberTable::Participants => "trip_participants",
        }
    }
}

async fn hydrate_one(conn: &mut PgConnection, row: TripRow) -> Result<Trip, DomainError> {
    let ids = [row.id];
    let owners = load_members(conn, MemberTable::Owners, &ids)
        .await?
        .remove(&row.id)
        .unwrap_or_default();
    let participants = load_members(conn, MemberTable::Participants, &ids)
        .await?
        .remove(&row.id)
        .unwrap_or_default();
    row.into_trip(owners, participants)
}

async fn load_members(
    conn: &mut PgConnection,
    table: MemberTable,
    trip_ids: &[Uuid],
) -> Result<HashMap<Uuid, BTreeSet<ActorHandle>>, DomainError> {
    let query = format!(
        "SELECT trip_id, login FROM {} WHERE trip_id = ANY($1)",
        table.name()
    );
    let rows: Vec<MemberRow> = sqlx::query_as(&query)
        .bind(trip_ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| db_error("Failed to load trip members", e))?;

    let mut members: HashMap<Uuid, BTreeSet<ActorHandle>> = HashMap::new();
    for row in rows {
        let handle = ActorHandle::new(row.login).map_err(|_| corrupt("login", "<blank>"))?;
        members.entry(row.trip_id).or_default().insert(handle);
    }
    Ok(members)
}

async fn replace_members(
    conn: &mut PgConnection,
    table: MemberTable,
    trip_id: &TripId,
    members: &BTreeSet<ActorHandle>,
) -> Result<(), DomainError> {
    let delete = format!("DELETE FROM {} WHERE trip_id = $1", table.name());
    sqlx::query(&delete)
        .bind(trip_id.as_uuid())
        .execute(&mut *conn)
        .await
        .map_err(|e| db_error("Failed to clear trip members", e))?;

    if members.is_empty() {
        return Ok(());
    }

    let logins: Vec<String> = members.iter().map(|m| m.as_str().to_string()).collect();
    let insert = format!(
        "INSERT INTO {} (trip_id, login) SELECT $1, UNNEST($2::text[])",
        table.name()
    );
    sqlx::query(&insert)
        .bind(trip_id.as_uuid())
        .bind(&logins)
        .execute(&mut *conn)
        .await
        .map_err(|e| db_error("Failed to insert trip members", e))?;

    Ok(())
}

fn db_error(context: &str, err: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, err))
}

fn corrupt(column: &str, value: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid stored value for {}: {}", column, value),
    )
}
