//! BookHub: time-slot reservation engine for a recreation venue.
//!
//! The crate is split into layers: `bookhub-core` holds shared types,
//! errors, and configuration; `bookhub-entity` the domain model;
//! `bookhub-store` the availability backends; `bookhub-engine` the
//! booking logic. This facade re-exports the public surface and wires
//! a configured engine together.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

pub use bookhub_core::config::{BookingConfig, LoggingConfig, StoreConfig, VenueConfig};
pub use bookhub_core::error::{BookingError, ErrorKind};
pub use bookhub_core::result::BookingResult;
pub use bookhub_core::types::{BookingId, Money, ResourceId, SlotIndex};
pub use bookhub_entity::{
    Booking, CalendarCell, CalendarDay, Resource, Selection, SlotAvailability, TimeSlot,
};
pub use bookhub_engine::{
    CalendarGenerator, PricingEngine, ReservationService, ReservationState, ResourceCatalog,
    SelectionManager, SlotGenerator,
};
pub use bookhub_store::{AvailabilityStore, StoreManager};

/// Initialize tracing from the logging section of the configuration.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// A fully wired engine: catalog plus store, ready to mint sessions.
///
/// The engine is shared; each caller gets its own [`ReservationService`]
/// whose selection and state are private to that session.
pub struct BookingEngine {
    config: BookingConfig,
    catalog: Arc<ResourceCatalog>,
    store: Arc<StoreManager>,
}

impl BookingEngine {
    /// Build an engine from configuration, connecting the configured
    /// store backend.
    pub async fn from_config(config: BookingConfig) -> BookingResult<Self> {
        let store = StoreManager::new(&config.store).await?;
        Ok(Self {
            config,
            catalog: Arc::new(ResourceCatalog::seed()),
            store: Arc::new(store),
        })
    }

    /// Build an engine around an existing store.
    pub fn with_store(config: BookingConfig, store: Arc<StoreManager>) -> Self {
        Self {
            config,
            catalog: Arc::new(ResourceCatalog::seed()),
            store,
        }
    }

    /// The venue's bookable resources.
    pub fn catalog(&self) -> &Arc<ResourceCatalog> {
        &self.catalog
    }

    /// The underlying availability store.
    pub fn store(&self) -> Arc<dyn AvailabilityStore> {
        Arc::clone(&self.store) as Arc<dyn AvailabilityStore>
    }

    /// Start a new reservation session.
    pub fn session(&self) -> BookingResult<ReservationService> {
        ReservationService::new(
            Arc::clone(&self.catalog),
            self.store(),
            &self.config.venue,
        )
    }

    /// Verify the store backend is reachable.
    pub async fn health_check(&self) -> BookingResult<bool> {
        self.store.health_check().await
    }
}
