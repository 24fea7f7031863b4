//! # bookhub-core
//!
//! Core crate for BookHub. Contains configuration schemas, typed
//! identifiers, the money type, and the unified error system.
//!
//! This crate has **no** internal dependencies on other BookHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::BookingError;
pub use result::BookingResult;
