//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use bookhub::{
    AvailabilityStore, BookingConfig, BookingEngine, ReservationService, ResourceId, StoreManager,
};
use bookhub_store::memory::MemoryAvailabilityStore;

/// A wired venue over a fresh in-memory store.
pub struct TestVenue {
    /// The engine under test.
    pub engine: BookingEngine,
    /// Direct handle on the store for out-of-band bookings.
    pub store: Arc<MemoryAvailabilityStore>,
}

impl TestVenue {
    /// Create a venue with the seeded catalog and an empty store.
    pub fn new() -> Self {
        let store = Arc::new(MemoryAvailabilityStore::new());
        let manager = StoreManager::from_store(
            Arc::clone(&store) as Arc<dyn AvailabilityStore>,
            Duration::from_secs(5),
        );
        let engine = BookingEngine::with_store(BookingConfig::default(), Arc::new(manager));
        Self { engine, store }
    }

    /// Start a fresh reservation session.
    pub fn session(&self) -> ReservationService {
        self.engine.session().expect("session should start")
    }

    /// Look up a seeded resource by name.
    pub fn resource(&self, name: &str) -> ResourceId {
        self.engine
            .catalog()
            .all()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("no seeded resource named '{name}'"))
            .id
    }
}

/// Today's date, the earliest bookable day.
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
