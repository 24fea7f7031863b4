//! Unified error types for BookHub.
//!
//! Every fallible operation in the engine returns [`BookingError`]. Variants
//! carry the structured detail (slot indices, dates, booking ids) a caller
//! needs to drive a precise retry, so no error is ever reduced to a bare
//! message on its way out.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::id::{BookingId, ResourceId};

/// Top-level error kind categorization used across the entire engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A date outside the bookable horizon (past, or too far ahead).
    InvalidDate,
    /// A slot that is no longer free was selected.
    SlotUnavailable,
    /// One or more requested slots were taken by a competing commit.
    Conflict,
    /// Confirmation was attempted with an empty selection.
    EmptySelection,
    /// The requested booking or resource was not found.
    NotFound,
    /// An operation was invoked in a state that does not permit it.
    InvalidTransition,
    /// Input validation failed.
    Validation,
    /// A configuration error occurred.
    Configuration,
    /// A database error occurred.
    Database,
    /// An operation exceeded its bounded wait.
    Timeout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDate => write!(f, "INVALID_DATE"),
            Self::SlotUnavailable => write!(f, "SLOT_UNAVAILABLE"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::EmptySelection => write!(f, "EMPTY_SELECTION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::InvalidTransition => write!(f, "INVALID_TRANSITION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Database => write!(f, "DATABASE"),
            Self::Timeout => write!(f, "TIMEOUT"),
        }
    }
}

/// The unified error type used throughout BookHub.
#[derive(Debug, Error)]
pub enum BookingError {
    /// The date is not bookable: it lies in the past or beyond the horizon.
    #[error("date {date} is not bookable")]
    InvalidDate {
        /// The rejected date.
        date: NaiveDate,
    },

    /// The slot was already taken when the selection tried to add it.
    #[error("slot {index} is no longer available")]
    SlotUnavailable {
        /// 1-based index of the stale slot.
        index: u16,
    },

    /// A commit lost the race for one or more slots.
    ///
    /// Only the slots listed here were taken by a competing booking; the
    /// remainder of the attempted selection is still free.
    #[error("slots {slots:?} were taken by a competing booking")]
    Conflict {
        /// Sorted indices of the slots that could not be committed.
        slots: Vec<u16>,
    },

    /// Confirmation requires at least one selected slot.
    #[error("cannot confirm an empty selection")]
    EmptySelection,

    /// No booking exists under the given id.
    #[error("booking {booking_id} not found")]
    NotFound {
        /// The id that failed to resolve.
        booking_id: BookingId,
    },

    /// No resource exists under the given id.
    #[error("resource {resource_id} not found")]
    ResourceNotFound {
        /// The id that failed to resolve.
        resource_id: ResourceId,
    },

    /// The reservation state machine rejected an out-of-order operation.
    #[error("cannot {operation} while in state {from}")]
    InvalidTransition {
        /// Name of the state the machine was in.
        from: &'static str,
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// Input validation failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Configuration loading or interpretation failed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The database rejected or failed an operation.
    #[error("database error: {message}")]
    Database {
        /// Human-readable description of the failing operation.
        message: String,
        /// Underlying driver error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A commit or cancel exceeded its bounded wait.
    #[error("operation timed out after {seconds}s")]
    Timeout {
        /// The configured bound that was exceeded.
        seconds: u64,
    },
}

impl BookingError {
    /// The kind of this error, for logging and coarse-grained matching.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDate { .. } => ErrorKind::InvalidDate,
            Self::SlotUnavailable { .. } => ErrorKind::SlotUnavailable,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::EmptySelection => ErrorKind::EmptySelection,
            Self::NotFound { .. } | Self::ResourceNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Database { .. } => ErrorKind::Database,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Create a database error wrapping its driver-level cause.
    pub fn database(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Database {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error is recoverable by refreshing availability and
    /// retrying with an adjusted selection.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SlotUnavailable { .. } | Self::Conflict { .. } | Self::Timeout { .. }
        )
    }
}

impl From<config::ConfigError> for BookingError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_error_names_lost_slots() {
        let err = BookingError::Conflict { slots: vec![1, 4] };
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "slots [1, 4] were taken by a competing booking");
    }

    #[test]
    fn empty_selection_is_not_retryable() {
        assert!(!BookingError::EmptySelection.is_retryable());
    }

    #[test]
    fn kind_display_codes_are_stable() {
        assert_eq!(ErrorKind::Conflict.to_string(), "CONFLICT");
        assert_eq!(ErrorKind::InvalidDate.to_string(), "INVALID_DATE");
    }
}
