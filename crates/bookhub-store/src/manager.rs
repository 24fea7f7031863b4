//! Store manager that dispatches to the configured backend.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use bookhub_core::BookingError;
use bookhub_core::config::StoreConfig;
use bookhub_core::result::BookingResult;
use bookhub_core::types::{BookingId, Money, ResourceId, SlotIndex};
use bookhub_entity::Booking;

use crate::store::AvailabilityStore;

/// Availability store manager wrapping the configured backend.
///
/// The backend is selected at construction time based on configuration.
/// The manager also enforces the bounded-wait rule: commits and cancels
/// either finish within the configured timeout or fail with
/// [`BookingError::Timeout`], never leaving the caller waiting.
#[derive(Clone)]
pub struct StoreManager {
    /// The inner store backend.
    inner: Arc<dyn AvailabilityStore>,
    /// Bounded wait applied to commit and cancel.
    commit_timeout: Duration,
}

impl std::fmt::Debug for StoreManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreManager")
            .field("commit_timeout", &self.commit_timeout)
            .finish_non_exhaustive()
    }
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StoreConfig) -> BookingResult<Self> {
        let inner: Arc<dyn AvailabilityStore> = match config.provider.as_str() {
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory availability store");
                Arc::new(crate::memory::MemoryAvailabilityStore::new())
            }
            #[cfg(feature = "postgres")]
            "postgres" => {
                info!("Initializing PostgreSQL availability store");
                Arc::new(crate::postgres::PgAvailabilityStore::connect(&config.database).await?)
            }
            other => {
                return Err(BookingError::Configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, postgres"
                )));
            }
        };

        Ok(Self {
            inner,
            commit_timeout: Duration::from_secs(config.commit_timeout_seconds),
        })
    }

    /// Create a store manager from an existing backend (for testing).
    pub fn from_store(store: Arc<dyn AvailabilityStore>, commit_timeout: Duration) -> Self {
        Self {
            inner: store,
            commit_timeout,
        }
    }

    /// Await `fut` for at most the commit timeout.
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = BookingResult<T>> + Send,
    ) -> BookingResult<T> {
        tokio::time::timeout(self.commit_timeout, fut)
            .await
            .map_err(|_| BookingError::Timeout {
                seconds: self.commit_timeout.as_secs(),
            })?
    }
}

#[async_trait]
impl AvailabilityStore for StoreManager {
    async fn query_availability(
        &self,
        resource_id: ResourceId,
        date: NaiveDate,
        slot_count: SlotIndex,
    ) -> BookingResult<BTreeMap<SlotIndex, bool>> {
        self.inner
            .query_availability(resource_id, date, slot_count)
            .await
    }

    async fn try_commit(
        &self,
        resource_id: ResourceId,
        date: NaiveDate,
        indices: &[SlotIndex],
        total: Money,
    ) -> BookingResult<Booking> {
        self.bounded(self.inner.try_commit(resource_id, date, indices, total))
            .await
    }

    async fn cancel(&self, booking_id: BookingId) -> BookingResult<()> {
        self.bounded(self.inner.cancel(booking_id)).await
    }

    async fn get_booking(&self, booking_id: BookingId) -> BookingResult<Booking> {
        self.inner.get_booking(booking_id).await
    }

    async fn list_bookings(
        &self,
        resource_id: ResourceId,
        date: NaiveDate,
    ) -> BookingResult<Vec<Booking>> {
        self.inner.list_bookings(resource_id, date).await
    }

    async fn health_check(&self) -> BookingResult<bool> {
        self.inner.health_check().await
    }
}
