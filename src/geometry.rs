//! Tagged geometry variants and bounding-box computation.
//!
//! Track storage hands geometry over as nested coordinate arrays in
//! (longitude, latitude) order, the convention used by GeoJSON-style
//! formats. The `from_lonlat_*` constructors are the single place where
//! that storage order is converted to the semantic latitude/longitude
//! fields of [`GpsPoint`]; everything downstream works with typed points
//! and an axis swap can no longer slip through.
//!
//! The bounding box of a track is what scopes the external POI query: the
//! candidate source is asked only for POIs inside (an expansion of) the
//! envelope, and fine-grained distance filtering happens afterwards in
//! [`crate::selection`].

use crate::{Bounds, GpsPoint};
use serde::{Deserialize, Serialize};

/// A geometry as supplied by track storage.
///
/// Exhaustive matching over this enum replaces the runtime type checks a
/// dynamically-typed representation would need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// A single location
    Point(GpsPoint),
    /// An open path; insertion order is travel order
    LineString(Vec<GpsPoint>),
    /// One or more rings of vertices (exterior first, then holes)
    Polygon(Vec<Vec<GpsPoint>>),
}

impl Geometry {
    /// Build a point from a (longitude, latitude) pair.
    pub fn point_from_lonlat(coord: [f64; 2]) -> Self {
        Geometry::Point(GpsPoint::new(coord[1], coord[0]))
    }

    /// Build a line string from (longitude, latitude) pairs.
    pub fn line_from_lonlat(coords: &[[f64; 2]]) -> Self {
        Geometry::LineString(coords.iter().map(|c| GpsPoint::new(c[1], c[0])).collect())
    }

    /// Build a polygon from rings of (longitude, latitude) pairs.
    pub fn polygon_from_lonlat(rings: &[Vec<[f64; 2]>]) -> Self {
        Geometry::Polygon(
            rings
                .iter()
                .map(|ring| ring.iter().map(|c| GpsPoint::new(c[1], c[0])).collect())
                .collect(),
        )
    }

    /// All vertices of the geometry, in order. For polygons, every ring's
    /// vertices count.
    pub fn vertices(&self) -> Vec<GpsPoint> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::LineString(points) => points.clone(),
            Geometry::Polygon(rings) => rings.iter().flatten().copied().collect(),
        }
    }

    /// The minimal lat/lng envelope enclosing every vertex.
    ///
    /// Returns `None` when the geometry yields no vertices (empty line
    /// string, polygon with no rings), which callers treat as "nothing to
    /// query" rather than an error.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Geometry::Point(p) => Bounds::from_points(std::slice::from_ref(p)),
            Geometry::LineString(points) => Bounds::from_points(points),
            Geometry::Polygon(rings) => {
                let vertices: Vec<GpsPoint> = rings.iter().flatten().copied().collect();
                Bounds::from_points(&vertices)
            }
        }
    }

    /// The travel path of the geometry, if it is an open path.
    ///
    /// Selection only orders POIs along line strings; points and polygons
    /// have no travel direction and degrade to pass-through.
    pub fn as_path(&self) -> Option<&[GpsPoint]> {
        match self {
            Geometry::LineString(points) if !points.is_empty() => Some(points),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lonlat_order_converted_at_ingestion() {
        // Storage order is (lon, lat); fields must come out swapped
        let geom = Geometry::line_from_lonlat(&[[-0.1278, 51.5074], [-0.1290, 51.5080]]);
        match &geom {
            Geometry::LineString(points) => {
                assert_eq!(points[0].latitude, 51.5074);
                assert_eq!(points[0].longitude, -0.1278);
            }
            _ => panic!("expected line string"),
        }
    }

    #[test]
    fn test_point_bounds() {
        let geom = Geometry::point_from_lonlat([-0.1278, 51.5074]);
        let bounds = geom.bounds().unwrap();
        assert_eq!(bounds.min_lat, 51.5074);
        assert_eq!(bounds.max_lat, 51.5074);
        assert_eq!(bounds.min_lng, -0.1278);
        assert_eq!(bounds.max_lng, -0.1278);
    }

    #[test]
    fn test_line_bounds() {
        let geom = Geometry::LineString(vec![
            GpsPoint::new(51.50, -0.13),
            GpsPoint::new(51.51, -0.12),
            GpsPoint::new(51.505, -0.125),
        ]);
        let bounds = geom.bounds().unwrap();
        assert_eq!(bounds.min_lat, 51.50);
        assert_eq!(bounds.max_lat, 51.51);
        assert_eq!(bounds.min_lng, -0.13);
        assert_eq!(bounds.max_lng, -0.12);
    }

    #[test]
    fn test_polygon_bounds_cover_all_rings() {
        let geom = Geometry::polygon_from_lonlat(&[
            vec![[-0.13, 51.50], [-0.12, 51.50], [-0.12, 51.51], [-0.13, 51.51]],
            // Hole extends beyond the exterior on purpose; all rings count
            vec![[-0.14, 51.505], [-0.125, 51.505], [-0.125, 51.508]],
        ]);
        let bounds = geom.bounds().unwrap();
        assert_eq!(bounds.min_lng, -0.14);
        assert_eq!(bounds.max_lat, 51.51);
    }

    #[test]
    fn test_empty_geometry_has_no_bounds() {
        assert!(Geometry::LineString(vec![]).bounds().is_none());
        assert!(Geometry::Polygon(vec![]).bounds().is_none());
        assert!(Geometry::Polygon(vec![vec![]]).bounds().is_none());
    }

    #[test]
    fn test_as_path() {
        let line = Geometry::LineString(vec![GpsPoint::new(51.5, -0.12)]);
        assert_eq!(line.as_path().map(|p| p.len()), Some(1));

        assert!(Geometry::LineString(vec![]).as_path().is_none());
        assert!(Geometry::Point(GpsPoint::new(51.5, -0.12)).as_path().is_none());
        assert!(Geometry::Polygon(vec![]).as_path().is_none());
    }
}
