//! Proximity filtering, deduplication, and ordering of POI candidates.
//!
//! This is the selection pipeline: every candidate is projected onto the
//! track to find its closest segment, candidates beyond the distance
//! threshold are dropped, near-duplicates collapse to the first-seen
//! survivor, and the rest come back ordered by position along the track.
//!
//! ## Algorithm
//!
//! 1. Degrade gracefully when the geometry is not an open path: return the
//!    first `max_results` candidates in input order (no distance concept
//!    applies).
//! 2. For every candidate, find the minimum perpendicular distance across
//!    all track segments and the matching `(segment, fraction)`; convert
//!    to a position along the whole track.
//! 3. Drop candidates farther than `max_distance_meters` from the track.
//! 4. Deduplicate with a pure fold in input order: a candidate within
//!    `duplicate_radius_meters` of an already-accepted one is dropped
//!    (first seen wins - a deterministic tie-break, not an arbitrary one).
//! 5. Stable-sort by ascending track position.
//! 6. Truncate to `max_results`, keeping the earliest encountered.
//!
//! The projection phase (step 2) is independent per candidate;
//! [`select_parallel`] runs it on rayon and leaves the dedup/sort tail
//! sequential. Long tracks are indexed with an R-tree over buffered
//! segment envelopes so each candidate only examines nearby segments.

use crate::geo_utils::{haversine_distance, meters_to_degrees, project_onto_segment};
use crate::{Candidate, Geometry, GpsPoint, Projection, SelectionConfig, Track};
use log::debug;
use rstar::{RTree, RTreeObject, AABB};

/// Tracks with at least this many segments get an R-tree index; shorter
/// tracks are cheaper to scan directly.
const SPATIAL_INDEX_MIN_SEGMENTS: usize = 64;

// =============================================================================
// Public API
// =============================================================================

/// Select the POIs near a track, deduplicated and ordered by the position
/// at which a traveller moving along the track would encounter them.
///
/// Non-path geometry (a point, a polygon, an empty line string) has no
/// travel order, so selection degrades to passing through the first
/// `max_results` candidates unchanged.
///
/// # Example
///
/// ```rust
/// use poi_select::{Candidate, Geometry, GpsPoint, SelectionConfig, select};
///
/// let track = Geometry::LineString(vec![
///     GpsPoint::new(0.0, 0.0),
///     GpsPoint::new(0.0, 1.0),
/// ]);
/// let candidates = vec![
///     Candidate::new(2, "cafe", GpsPoint::new(0.0001, 0.8)),
///     Candidate::new(1, "cafe", GpsPoint::new(0.0001, 0.2)),
/// ];
///
/// let selected = select(&track, &candidates, &SelectionConfig::default());
///
/// // Ordered by position along the track, not input order
/// assert_eq!(selected[0].external_id, 1);
/// assert_eq!(selected[1].external_id, 2);
/// ```
pub fn select(
    geometry: &Geometry,
    candidates: &[Candidate],
    config: &SelectionConfig,
) -> Vec<Candidate> {
    let Some(path) = geometry.as_path() else {
        debug!("geometry is not an open path, passing through {} candidates",
               candidates.len().min(config.max_results));
        return candidates.iter().take(config.max_results).cloned().collect();
    };

    let Some(track) = Track::new(path) else {
        return candidates.iter().take(config.max_results).cloned().collect();
    };
    let projector = Projector::new(&track, config.max_distance_meters);

    let projections: Vec<Option<Projection>> = candidates
        .iter()
        .map(|c| projector.project(&c.position))
        .collect();

    finish_selection(candidates, projections, config)
}

/// Parallel variant of [`select`]: the per-candidate projection phase runs
/// on rayon, the dedup and ordering passes stay sequential. Results are
/// identical to the sequential version.
///
/// Recommended for large candidate sets (1000+).
#[cfg(feature = "parallel")]
pub fn select_parallel(
    geometry: &Geometry,
    candidates: &[Candidate],
    config: &SelectionConfig,
) -> Vec<Candidate> {
    use rayon::prelude::*;

    let Some(path) = geometry.as_path() else {
        return candidates.iter().take(config.max_results).cloned().collect();
    };

    let Some(track) = Track::new(path) else {
        return candidates.iter().take(config.max_results).cloned().collect();
    };
    let projector = Projector::new(&track, config.max_distance_meters);

    // Map phase: independent per candidate; collect preserves input order
    let projections: Vec<Option<Projection>> = candidates
        .par_iter()
        .map(|c| projector.project(&c.position))
        .collect();

    finish_selection(candidates, projections, config)
}

/// Project a single point onto a track, scanning every segment.
///
/// Returns the global best match: the segment with the minimum
/// perpendicular distance, its projection fraction, and the resulting
/// position along the track. Single-vertex tracks report the distance to
/// the lone vertex at position 0.
pub fn project_onto_track(track: &Track, point: &GpsPoint) -> Projection {
    let points = track.points();

    if track.segment_count() == 0 {
        return Projection {
            segment_index: 0,
            fraction: 0.0,
            perpendicular_distance: haversine_distance(point, &points[0]),
            track_position: 0.0,
        };
    }

    best_projection(track, point, 0..track.segment_count())
        .expect("non-empty segment range yields a projection")
}

// =============================================================================
// Projection Internals
// =============================================================================

/// Per-call projection helper: scans segments directly for short tracks,
/// queries an R-tree of buffered segment envelopes for long ones.
enum Projector<'a> {
    Scan {
        track: &'a Track<'a>,
    },
    Indexed {
        track: &'a Track<'a>,
        rtree: RTree<SegmentEnvelope>,
    },
}

impl<'a> Projector<'a> {
    fn new(track: &'a Track<'a>, max_distance_meters: f64) -> Self {
        if track.segment_count() < SPATIAL_INDEX_MIN_SEGMENTS {
            return Projector::Scan { track };
        }

        let points = track.points();
        // Buffer each envelope by the distance threshold so that any
        // segment within range of a candidate intersects the candidate's
        // point query. meters_to_degrees is conservative (too large) on
        // the latitude axis, which only widens the candidate set.
        let envelopes: Vec<SegmentEnvelope> = points
            .windows(2)
            .enumerate()
            .map(|(index, w)| {
                let buffer =
                    meters_to_degrees(max_distance_meters.max(0.0), w[0].latitude);
                SegmentEnvelope {
                    index,
                    min_lng: w[0].longitude.min(w[1].longitude) - buffer,
                    min_lat: w[0].latitude.min(w[1].latitude) - buffer,
                    max_lng: w[0].longitude.max(w[1].longitude) + buffer,
                    max_lat: w[0].latitude.max(w[1].latitude) + buffer,
                }
            })
            .collect();

        debug!("indexed {} track segments for projection", envelopes.len());
        Projector::Indexed { track, rtree: RTree::bulk_load(envelopes) }
    }

    /// Best projection of `point` onto the track, or `None` when the
    /// spatial index proves the point is beyond the distance threshold of
    /// every segment.
    fn project(&self, point: &GpsPoint) -> Option<Projection> {
        match self {
            Projector::Scan { track } => Some(project_onto_track(track, point)),
            Projector::Indexed { track, rtree } => {
                let query = AABB::from_point([point.longitude, point.latitude]);
                let nearby = rtree
                    .locate_in_envelope_intersecting(&query)
                    .map(|env| env.index);
                best_projection(track, point, nearby)
            }
        }
    }
}

/// Minimum-distance projection of `point` across the given segments.
fn best_projection(
    track: &Track,
    point: &GpsPoint,
    segments: impl Iterator<Item = usize>,
) -> Option<Projection> {
    let points = track.points();
    let mut best: Option<Projection> = None;

    for i in segments {
        let (fraction, distance) = project_onto_segment(point, &points[i], &points[i + 1]);
        let closer = match &best {
            Some(b) => distance < b.perpendicular_distance,
            None => true,
        };
        if closer {
            best = Some(Projection {
                segment_index: i,
                fraction,
                perpendicular_distance: distance,
                track_position: track.position_at(i, fraction),
            });
        }
    }

    best
}

// =============================================================================
// Filtering, Deduplication, Ordering
// =============================================================================

/// Sequential reduce phase: threshold filter, dedup fold, stable sort by
/// track position, truncation.
fn finish_selection(
    candidates: &[Candidate],
    projections: Vec<Option<Projection>>,
    config: &SelectionConfig,
) -> Vec<Candidate> {
    let within_range: Vec<(&Candidate, Projection)> = candidates
        .iter()
        .zip(projections)
        .filter_map(|(c, p)| p.map(|p| (c, p)))
        .filter(|(_, p)| p.perpendicular_distance <= config.max_distance_meters)
        .collect();

    // Dedup fold: first seen (input order) wins
    let accepted: Vec<(&Candidate, Projection)> =
        within_range.into_iter().fold(Vec::new(), |mut accepted, (c, p)| {
            let duplicate = accepted.iter().any(|&(kept, _)| {
                haversine_distance(&c.position, &kept.position)
                    <= config.duplicate_radius_meters
            });
            if !duplicate {
                accepted.push((c, p));
            }
            accepted
        });

    // Stable sort: equal positions keep input order
    let mut ordered = accepted;
    ordered.sort_by(|a, b| {
        a.1.track_position
            .partial_cmp(&b.1.track_position)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    debug!(
        "selected {} of {} candidates (cap {})",
        ordered.len().min(config.max_results),
        candidates.len(),
        config.max_results
    );

    ordered
        .into_iter()
        .take(config.max_results)
        .map(|(c, _)| c.clone())
        .collect()
}

// =============================================================================
// R-tree Indexed Segment Envelope
// =============================================================================

/// A track segment's bounding box, buffered by the distance threshold.
#[derive(Debug, Clone, Copy)]
struct SegmentEnvelope {
    index: usize,
    min_lng: f64,
    min_lat: f64,
    max_lng: f64,
    max_lat: f64,
}

impl RTreeObject for SegmentEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_lng, self.min_lat], [self.max_lng, self.max_lat])
    }
}

// =============================================================================
// Tests
// =============================================================================
