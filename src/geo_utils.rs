//! # Geographic Utilities
//!
//! Core geographic computation for POI selection along GPS tracks.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two GPS points |
//! | [`polyline_length`] | Total length of a GPS track in meters |
//! | [`project_onto_segment`] | Nearest point on a track segment |
//! | [`point_to_segment_distance`] | Minimum distance to a track segment |
//! | [`meters_to_degrees`] | Convert meters to approximate degrees at a latitude |
//!
//! ## Algorithm Notes
//!
//! ### Haversine Formula
//!
//! Great-circle distances come from the haversine formula (via the `geo`
//! crate, spherical Earth of radius 6,371 km), accurate to within 0.3% for
//! practical GPS work.
//!
//! Reference: [Haversine formula (Wikipedia)](https://en.wikipedia.org/wiki/Haversine_formula)
//!
//! ### Segment Projection
//!
//! [`project_onto_segment`] finds the projection fraction with a planar
//! dot product in raw (lat, lon) space and then measures the distance to
//! the interpolated point with haversine. Mixing a planar foot with a
//! spherical metric is an intentional, bounded approximation: it is
//! accurate for typical track segments (tens to low hundreds of meters)
//! and degrades for multi-kilometer segments, near the poles, or across
//! the antimeridian. Correctness at those scales was never a requirement.
//!
//! ### Coordinate System
//!
//! All functions expect WGS84 coordinates (latitude/longitude in degrees).

use crate::GpsPoint;
use geo::{Distance, Haversine, Point};

/// Segments shorter than this are treated as degenerate (both endpoints
/// effectively the same place), in meters.
const DEGENERATE_SEGMENT_METERS: f64 = 1.0;

// =============================================================================
// Distance Functions
// =============================================================================

/// Calculate the great-circle distance between two GPS points using the
/// Haversine formula.
///
/// Returns the distance in meters along the Earth's surface. Symmetric,
/// and zero for identical points.
///
/// # Example
///
/// ```rust
/// use poi_select::{GpsPoint, geo_utils};
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance(&london, &paris);
/// assert!((distance - 343_560.0).abs() < 1000.0); // ~344 km
/// ```
#[inline]
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Calculate the total length of a polyline (GPS track) in meters.
///
/// Sums the haversine distance between consecutive points. Empty or
/// single-point tracks return 0.0.
pub fn polyline_length(points: &[GpsPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Convert meters to approximate degrees at a given latitude.
///
/// At the equator 1 degree is about 111,320 meters; the figure shrinks
/// with cos(latitude) for longitude. Returns a single conservative value
/// suitable for buffering bounding boxes before a fine distance check.
#[inline]
pub fn meters_to_degrees(meters: f64, latitude: f64) -> f64 {
    let lat_rad = latitude.to_radians();
    let meters_per_degree = 111_320.0 * lat_rad.cos().max(0.1);
    meters / meters_per_degree
}

// =============================================================================
// Segment Projection
// =============================================================================

/// Project a query point onto the segment from `start` to `end`.
///
/// Returns `(t, distance)` where `t` is the projection fraction clamped to
/// `0.0..=1.0` (0 at `start`, 1 at `end`) and `distance` is the
/// great-circle distance in meters from the query point to the projected
/// point.
///
/// Degenerate segments (endpoints less than a meter apart) fall back to
/// whichever endpoint is closer, with `t` forced to 0.0 or 1.0.
///
/// See the module docs for the accuracy bounds of the planar projection.
///
/// # Example
///
/// ```rust
/// use poi_select::{GpsPoint, geo_utils};
///
/// let start = GpsPoint::new(0.0, 0.0);
/// let end = GpsPoint::new(0.0, 1.0);
/// let query = GpsPoint::new(0.0001, 0.5);
///
/// let (t, dist) = geo_utils::project_onto_segment(&query, &start, &end);
/// assert!((t - 0.5).abs() < 0.01);
/// assert!(dist < 50.0); // ~11m off the segment
/// ```
pub fn project_onto_segment(query: &GpsPoint, start: &GpsPoint, end: &GpsPoint) -> (f64, f64) {
    if haversine_distance(start, end) < DEGENERATE_SEGMENT_METERS {
        let to_start = haversine_distance(query, start);
        let to_end = haversine_distance(query, end);
        return if to_start <= to_end {
            (0.0, to_start)
        } else {
            (1.0, to_end)
        };
    }

    // Planar dot-product projection in (lat, lon) space
    let seg_lat = end.latitude - start.latitude;
    let seg_lng = end.longitude - start.longitude;
    let to_query_lat = query.latitude - start.latitude;
    let to_query_lng = query.longitude - start.longitude;

    let t = (to_query_lat * seg_lat + to_query_lng * seg_lng)
        / (seg_lat * seg_lat + seg_lng * seg_lng);
    let t = t.clamp(0.0, 1.0);

    let foot = GpsPoint::new(start.latitude + t * seg_lat, start.longitude + t * seg_lng);

    (t, haversine_distance(query, &foot))
}

/// Minimum great-circle distance in meters from a point to a segment.
#[inline]
pub fn point_to_segment_distance(query: &GpsPoint, start: &GpsPoint, end: &GpsPoint) -> f64 {
    project_onto_segment(query, start, end).1
}

// =============================================================================
// Unit Tests
// =============================================================================
