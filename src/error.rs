//! Error types for ingestion-time validation.
//!
//! The selection pipeline itself degrades gracefully instead of failing:
//! geometry with no usable vertices yields a pass-through result, and
//! non-positive thresholds yield an empty one. Errors only arise at the
//! ingestion boundary, where raw coordinates enter the system.

use thiserror::Error;

/// Errors surfaced when validating external input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectError {
    /// Latitude or longitude outside its valid range, or non-finite.
    #[error("coordinate out of range: latitude {latitude}, longitude {longitude}")]
    OutOfRangeCoordinate { latitude: f64, longitude: f64 },
}
