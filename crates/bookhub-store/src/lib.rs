//! # bookhub-store
//!
//! Availability store implementations for BookHub. The store is the single
//! source of truth for which slots are taken and arbitrates every
//! reservation attempt, guaranteeing at most one booking per
//! (resource, date, slot) identity.
//!
//! Two backends are provided behind [`store::AvailabilityStore`]:
//! - in-memory (`dashmap` day map, one `tokio::sync::Mutex` per day)
//! - PostgreSQL (`sqlx`, uniqueness constraint on the slot identity triple)
//!
//! [`manager::StoreManager`] selects the backend from configuration and
//! enforces the bounded-wait rule on commits and cancels.

pub mod manager;
pub mod store;

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use manager::StoreManager;
pub use store::AvailabilityStore;
