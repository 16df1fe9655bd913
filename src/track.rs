//! Track segment lengths and cumulative distance-from-start.
//!
//! [`Track`] normalizes an ordered vertex sequence into per-segment lengths
//! and prefix sums so that a projection fraction on any segment converts
//! straight into a position along the whole track.

use crate::geo_utils::haversine_distance;
use crate::GpsPoint;

/// An ordered, non-empty GPS track with precomputed segment lengths.
///
/// Derived data is computed once at construction; all queries afterwards
/// are O(1).
#[derive(Debug, Clone)]
pub struct Track<'a> {
    points: &'a [GpsPoint],
    /// Length of segment i in meters (between vertex i and i+1)
    segment_lengths: Vec<f64>,
    /// cumulative[i] = distance along the track from vertex 0 to vertex i
    cumulative: Vec<f64>,
}

impl<'a> Track<'a> {
    /// Build a track over the given vertices. Returns `None` for an empty
    /// slice; a single-vertex track is valid and has zero segments.
    pub fn new(points: &'a [GpsPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let segment_lengths: Vec<f64> = points
            .windows(2)
            .map(|w| haversine_distance(&w[0], &w[1]))
            .collect();

        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative.push(0.0);
        for length in &segment_lengths {
            total += length;
            cumulative.push(total);
        }

        Some(Self { points, segment_lengths, cumulative })
    }

    /// The track's vertices in travel order.
    #[inline]
    pub fn points(&self) -> &[GpsPoint] {
        self.points
    }

    /// Number of segments: one less than the vertex count, zero for a
    /// single-vertex track.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segment_lengths.len()
    }

    /// Length of segment `i` in meters.
    #[inline]
    pub fn segment_length(&self, i: usize) -> f64 {
        self.segment_lengths[i]
    }

    /// Distance along the track from the first vertex to vertex `i`,
    /// in meters.
    #[inline]
    pub fn cumulative_distance(&self, i: usize) -> f64 {
        self.cumulative[i]
    }

    /// Total track length in meters.
    #[inline]
    pub fn total_length(&self) -> f64 {
        *self.cumulative.last().unwrap_or(&0.0)
    }

    /// Convert a (segment, fraction) pair into a position along the track.
    #[inline]
    pub fn position_at(&self, segment_index: usize, fraction: f64) -> f64 {
        if self.segment_lengths.is_empty() {
            return 0.0;
        }
        self.cumulative[segment_index] + fraction * self.segment_lengths[segment_index]
    }
}
