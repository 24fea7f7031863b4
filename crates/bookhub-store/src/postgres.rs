//! PostgreSQL-backed availability store.
//!
//! Atomicity rests on the `UNIQUE (resource_id, slot_date, slot_index)`
//! constraint on `booking_slots`: even under process-level concurrency at
//! most one booking can ever claim a slot identity. The transaction locks
//! existing rows with `FOR UPDATE` to report conflicts precisely; the
//! constraint catches the remaining insert race.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use tracing::{info, warn};

use bookhub_core::BookingError;
use bookhub_core::config::DatabaseConfig;
use bookhub_core::result::BookingResult;
use bookhub_core::types::{BookingId, Money, ResourceId, SlotIndex};
use bookhub_entity::Booking;

use crate::store::AvailabilityStore;

/// PostgreSQL availability store.
#[derive(Debug, Clone)]
pub struct PgAvailabilityStore {
    /// The sqlx connection pool.
    pool: PgPool,
}

impl PgAvailabilityStore {
    /// Connect to PostgreSQL and run pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> BookingResult<Self> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| BookingError::database("Failed to connect to database", e))?;

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .map_err(|e| BookingError::database("Failed to run migrations", e))?;

        info!("Connected to PostgreSQL, migrations up to date");
        Ok(Self { pool })
    }

    /// Wrap an existing pool (for tests that manage their own schema).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Taken slot indices among `indices` on the given day.
    async fn taken_among(
        &self,
        resource_id: ResourceId,
        date: NaiveDate,
        indices: &[i16],
    ) -> BookingResult<Vec<SlotIndex>> {
        let taken: Vec<i16> = sqlx::query_scalar(
            "SELECT slot_index FROM booking_slots \
             WHERE resource_id = $1 AND slot_date = $2 AND slot_index = ANY($3) \
             ORDER BY slot_index",
        )
        .bind(resource_id)
        .bind(date)
        .bind(indices)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BookingError::database("Failed to query taken slots", e))?;
        Ok(taken.into_iter().map(|i| i as SlotIndex).collect())
    }
}

/// Whether a sqlx error is a unique-constraint violation (SQLSTATE 23505).
fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23505")
}

/// Rebuild a [`Booking`] from an aggregated row.
fn booking_from_row(row: &PgRow) -> Result<Booking, sqlx::Error> {
    let indices: Vec<i16> = row.try_get("slot_indices")?;
    Ok(Booking {
        id: row.try_get::<BookingId, _>("id")?,
        resource_id: row.try_get::<ResourceId, _>("resource_id")?,
        date: row.try_get::<NaiveDate, _>("booking_date")?,
        slot_indices: indices.into_iter().map(|i| i as SlotIndex).collect(),
        total: Money::from_minor(row.try_get::<i64, _>("total_paise")?),
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

const BOOKING_SELECT: &str = "SELECT b.id, b.resource_id, b.booking_date, b.total_paise, \
     b.created_at, array_agg(s.slot_index ORDER BY s.slot_index) AS slot_indices \
     FROM bookings b JOIN booking_slots s ON s.booking_id = b.id";

#[async_trait]
impl AvailabilityStore for PgAvailabilityStore {
    async fn query_availability(
        &self,
        resource_id: ResourceId,
        date: NaiveDate,
        slot_count: SlotIndex,
    ) -> BookingResult<BTreeMap<SlotIndex, bool>> {
        // A single statement reads one MVCC snapshot, so the mapping can
        // never mix the halves of two commits.
        let taken: Vec<i16> = sqlx::query_scalar(
            "SELECT slot_index FROM booking_slots \
             WHERE resource_id = $1 AND slot_date = $2",
        )
        .bind(resource_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BookingError::database("Failed to query availability", e))?;

        let taken: Vec<SlotIndex> = taken.into_iter().map(|i| i as SlotIndex).collect();
        Ok((1..=slot_count)
            .map(|index| (index, !taken.contains(&index)))
            .collect())
    }

    async fn try_commit(
        &self,
        resource_id: ResourceId,
        date: NaiveDate,
        indices: &[SlotIndex],
        total: Money,
    ) -> BookingResult<Booking> {
        if indices.is_empty() {
            return Err(BookingError::EmptySelection);
        }

        let mut slot_indices: Vec<SlotIndex> = indices.to_vec();
        slot_indices.sort_unstable();
        slot_indices.dedup();
        let as_i16: Vec<i16> = slot_indices.iter().map(|i| *i as i16).collect();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| BookingError::database("Failed to begin transaction", e))?;

        let conflicts: Vec<i16> = sqlx::query_scalar(
            "SELECT slot_index FROM booking_slots \
             WHERE resource_id = $1 AND slot_date = $2 AND slot_index = ANY($3) \
             ORDER BY slot_index FOR UPDATE",
        )
        .bind(resource_id)
        .bind(date)
        .bind(&as_i16)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| BookingError::database("Failed to check slot availability", e))?;

        if !conflicts.is_empty() {
            let slots: Vec<SlotIndex> = conflicts.into_iter().map(|i| i as SlotIndex).collect();
            warn!(
                resource_id = %resource_id,
                date = %date,
                conflicts = ?slots,
                "Commit rejected, slots already taken"
            );
            return Err(BookingError::Conflict { slots });
        }

        let booking = Booking {
            id: BookingId::new(),
            resource_id,
            date,
            slot_indices,
            total,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO bookings (id, resource_id, booking_date, total_paise, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(booking.id)
        .bind(resource_id)
        .bind(date)
        .bind(total.minor_units())
        .bind(booking.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| BookingError::database("Failed to insert booking", e))?;

        let insert_slots = sqlx::query(
            "INSERT INTO booking_slots (booking_id, resource_id, slot_date, slot_index) \
             SELECT $1, $2, $3, unnest($4::smallint[])",
        )
        .bind(booking.id)
        .bind(resource_id)
        .bind(date)
        .bind(&as_i16)
        .execute(&mut *tx)
        .await;

        if let Err(e) = insert_slots {
            drop(tx);
            if is_unique_violation(&e) {
                // `FOR UPDATE` cannot lock rows that do not exist yet, so a
                // racing commit may slip between check and insert. The
                // uniqueness constraint rejects it; report the lost slots.
                let slots = self.taken_among(resource_id, date, &as_i16).await?;
                return Err(BookingError::Conflict { slots });
            }
            return Err(BookingError::database("Failed to insert booking slots", e));
        }

        tx.commit()
            .await
            .map_err(|e| BookingError::database("Failed to commit booking", e))?;

        info!(
            booking_id = %booking.id,
            resource_id = %resource_id,
            date = %date,
            slots = booking.slot_count(),
            total = %booking.total,
            "Booking committed"
        );
        Ok(booking)
    }

    async fn cancel(&self, booking_id: BookingId) -> BookingResult<()> {
        // booking_slots rows go with the booking via ON DELETE CASCADE,
        // atomically in the single statement.
        let deleted = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(booking_id)
            .execute(&self.pool)
            .await
            .map_err(|e| BookingError::database("Failed to cancel booking", e))?;

        if deleted.rows_affected() == 0 {
            return Err(BookingError::NotFound { booking_id });
        }

        info!(booking_id = %booking_id, "Booking cancelled, slots released");
        Ok(())
    }

    async fn get_booking(&self, booking_id: BookingId) -> BookingResult<Booking> {
        let row = sqlx::query(&format!("{BOOKING_SELECT} WHERE b.id = $1 GROUP BY b.id"))
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BookingError::database("Failed to fetch booking", e))?
            .ok_or(BookingError::NotFound { booking_id })?;

        booking_from_row(&row).map_err(|e| BookingError::database("Failed to decode booking", e))
    }

    async fn list_bookings(
        &self,
        resource_id: ResourceId,
        date: NaiveDate,
    ) -> BookingResult<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            "{BOOKING_SELECT} WHERE b.resource_id = $1 AND b.booking_date = $2 \
             GROUP BY b.id ORDER BY b.created_at"
        ))
        .bind(resource_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BookingError::database("Failed to list bookings", e))?;

        rows.iter()
            .map(|row| {
                booking_from_row(row)
                    .map_err(|e| BookingError::database("Failed to decode booking", e))
            })
            .collect()
    }

    async fn health_check(&self) -> BookingResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| BookingError::database("Health check failed", e))
    }
}
