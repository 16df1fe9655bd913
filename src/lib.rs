//! # POI Select
//!
//! Selection and ordering of points of interest (POIs) along GPS tracks.
//!
//! Given a travelled track and a list of candidate POIs (typically fetched
//! from an external query service scoped by the track's bounding box), this
//! library picks the candidates that lie close enough to the track, removes
//! near-duplicates, and returns the survivors in the order a traveller
//! moving along the track would encounter them.
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel candidate projection with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use poi_select::{Candidate, Geometry, GpsPoint, SelectionConfig, select};
//!
//! // A short track heading north through London
//! let track = Geometry::LineString(vec![
//!     GpsPoint::new(51.5074, -0.1278),
//!     GpsPoint::new(51.5080, -0.1290),
//!     GpsPoint::new(51.5090, -0.1300),
//! ]);
//!
//! let candidates = vec![
//!     Candidate::new(1, "fountain", GpsPoint::new(51.5081, -0.1291)),
//! ];
//!
//! let selected = select(&track, &candidates, &SelectionConfig::default());
//! assert_eq!(selected.len(), 1);
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | Bounding box (scopes the external candidate query) | [`geometry`] |
//! | Great-circle distance and segment projection | [`geo_utils`] |
//! | Per-segment lengths and cumulative track position | [`track`] |
//! | Proximity filter, dedup, ordering | [`selection`] |
//!
//! The core is pure: no I/O, no shared state, and concurrent calls with
//! different inputs are fully independent. Fetching candidates, persisting
//! results, and rendering maps are caller concerns.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Unified error handling
pub mod error;
pub use error::SelectError;

// Tagged geometry variants and bounding-box computation
pub mod geometry;
pub use geometry::Geometry;

// Geographic primitives (haversine, segment projection)
pub mod geo_utils;

// Track segment lengths and cumulative positions
pub mod track;
pub use track::Track;

// Proximity filtering, deduplication, ordering
pub mod selection;
pub use selection::select;
#[cfg(feature = "parallel")]
pub use selection::select_parallel;

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use poi_select::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Create a GPS point, rejecting out-of-range or non-finite coordinates.
    ///
    /// Intended for ingestion boundaries; the selection pipeline itself
    /// assumes pre-validated points and does not re-check on every call.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, SelectError> {
        let point = Self { latitude, longitude };
        if point.is_valid() {
            Ok(point)
        } else {
            Err(SelectError::OutOfRangeCoordinate { latitude, longitude })
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Bounding box for a set of GPS points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from GPS points. Returns `None` for an empty slice.
    pub fn from_points(points: &[GpsPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lng = min_lng.min(p.longitude);
            max_lng = max_lng.max(p.longitude);
        }

        Some(Self { min_lat, max_lat, min_lng, max_lng })
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GpsPoint {
        GpsPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

/// An externally supplied POI candidate.
///
/// Opaque beyond position and identity: `kind`, `tags`, and `name` are
/// pass-through data from the external query service and carry no meaning
/// inside the selection pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Identifier assigned by the external POI source
    pub external_id: i64,
    /// Source-defined category, e.g. "drinking_water" or "viewpoint"
    pub kind: String,
    /// Raw attribute tags from the source
    #[serde(default)]
    pub tags: HashMap<String, String>,
    /// Where the POI is located
    pub position: GpsPoint,
    /// Human-readable name, when the source has one
    #[serde(default)]
    pub name: Option<String>,
}

impl Candidate {
    /// Create a candidate with no tags and no name.
    pub fn new(external_id: i64, kind: &str, position: GpsPoint) -> Self {
        Self {
            external_id,
            kind: kind.to_string(),
            tags: HashMap::new(),
            position,
            name: None,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

/// Result of matching a point against a track.
///
/// Transient: produced and consumed within a single selection pass,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Index of the track segment the point projects onto
    pub segment_index: usize,
    /// Position of the perpendicular foot on that segment, 0.0..=1.0
    pub fraction: f64,
    /// Great-circle distance from the point to its projection, in meters
    pub perpendicular_distance: f64,
    /// Distance along the track from its first vertex to the projection,
    /// in meters
    pub track_position: f64,
}

/// Configuration for POI selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Maximum distance from the track for a candidate to qualify.
    /// Default: 500.0 meters
    pub max_distance_meters: f64,

    /// Candidates within this distance of an already-accepted candidate are
    /// dropped as near-duplicates. 0.0 collapses only coincident positions.
    /// Should be smaller than `max_distance_meters`. Default: 100.0 meters
    pub duplicate_radius_meters: f64,

    /// Maximum number of POIs to return; the earliest along the track are
    /// kept. Default: 10
    pub max_results: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_distance_meters: 500.0,
            duplicate_radius_meters: 100.0,
            max_results: 10,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gps_point_validation() {
        assert!(GpsPoint::new(51.5074, -0.1278).is_valid());
        assert!(!GpsPoint::new(91.0, 0.0).is_valid());
        assert!(!GpsPoint::new(0.0, 181.0).is_valid());
        assert!(!GpsPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert!(GpsPoint::try_new(51.5, -0.12).is_ok());
        let err = GpsPoint::try_new(-100.0, 0.0).unwrap_err();
        match err {
            SelectError::OutOfRangeCoordinate { latitude, .. } => {
                assert_eq!(latitude, -100.0);
            }
        }
    }

    #[test]
    fn test_bounds_from_points() {
        let points = vec![
            GpsPoint::new(51.50, -0.13),
            GpsPoint::new(51.51, -0.12),
            GpsPoint::new(51.505, -0.125),
        ];
        let bounds = Bounds::from_points(&points).unwrap();
        assert_eq!(bounds.min_lat, 51.50);
        assert_eq!(bounds.max_lat, 51.51);
        assert_eq!(bounds.min_lng, -0.13);
        assert_eq!(bounds.max_lng, -0.12);
    }

    #[test]
    fn test_bounds_from_points_empty() {
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_bounds_center() {
        let bounds = Bounds {
            min_lat: 51.50,
            max_lat: 51.52,
            min_lng: -0.12,
            max_lng: -0.10,
        };
        let center = bounds.center();
        assert!((center.latitude - 51.51).abs() < 1e-9);
        assert!((center.longitude - (-0.11)).abs() < 1e-9);
    }

    #[test]
    fn test_candidate_builder() {
        let c = Candidate::new(42, "viewpoint", GpsPoint::new(51.5, -0.12))
            .with_name("Primrose Hill");
        assert_eq!(c.external_id, 42);
        assert_eq!(c.kind, "viewpoint");
        assert_eq!(c.name.as_deref(), Some("Primrose Hill"));
        assert!(c.tags.is_empty());
    }

    #[test]
    fn test_candidate_deserializes_without_optional_fields() {
        let c: Candidate = serde_json::from_str(
            r#"{"external_id": 7, "kind": "bench",
                "position": {"latitude": 51.5, "longitude": -0.12}}"#,
        )
        .unwrap();
        assert_eq!(c.external_id, 7);
        assert!(c.name.is_none());
        assert!(c.tags.is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = SelectionConfig::default();
        assert_eq!(config.max_distance_meters, 500.0);
        assert_eq!(config.duplicate_radius_meters, 100.0);
        assert_eq!(config.max_results, 10);
    }
}
