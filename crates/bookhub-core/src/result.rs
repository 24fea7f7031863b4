//! Convenience result type alias for BookHub.

use crate::error::BookingError;

/// A specialized `Result` type for BookHub operations.
///
/// Defined as a convenience so that every crate does not need to write
/// `Result<T, BookingError>` explicitly.
pub type BookingResult<T> = Result<T, BookingError>;
