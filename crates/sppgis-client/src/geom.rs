//! Wire geometry for polygon submissions.
//!
//! The server speaks GeoJSON. Hosts usually hold geometry as `geo` crate
//! types, so this module provides a GeoJSON-shaped serde enum for request
//! bodies plus conversions from `geo::Polygon` / `geo::MultiPolygon` and
//! ring-level validation applied before anything reaches the network.

use serde::{Deserialize, Serialize};

/// A single coordinate pair (x/longitude, y/latitude)
pub type Position = [f64; 2];

/// One polygon as a set of rings, exterior first.
///
/// Rings are kept as raw coordinate arrays so that validation can report
/// open or degenerate rings exactly as the caller supplied them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaPolygon {
    pub rings: Vec<Vec<Position>>,
}

impl AreaPolygon {
    /// Create a polygon from rings, exterior first
    pub fn new(rings: Vec<Vec<Position>>) -> Self {
        Self { rings }
    }

    /// Convert from a `geo` crate polygon
    pub fn from_geo(polygon: &geo::Polygon<f64>) -> Self {
        let mut rings = Vec::with_capacity(1 + polygon.interiors().len());
        rings.push(ring_coords(polygon.exterior()));
        for interior in polygon.interiors() {
            rings.push(ring_coords(interior));
        }
        Self { rings }
    }

    /// Validate ring structure: every ring closed with at least 4 positions
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::valid();

        if self.rings.is_empty() {
            result.add_error("Polygon".to_string(), "Polygon has no rings".to_string());
            return result;
        }

        for (i, ring) in self.rings.iter().enumerate() {
            let location = if i == 0 {
                "Polygon exterior".to_string()
            } else {
                format!("Polygon interior[{}]", i - 1)
            };

            if ring.len() < 4 {
                result.add_error(
                    location.clone(),
                    format!("Ring must have at least 4 points, found {}", ring.len()),
                );
                continue;
            }

            if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
                if first != last {
                    result.add_error(
                        location,
                        "Ring must be closed (first point == last point)".to_string(),
                    );
                }
            }

            for (j, coord) in ring.iter().enumerate() {
                if !coord[0].is_finite() || !coord[1].is_finite() {
                    result.add_error(
                        format!("Ring[{}][{}]", i, j),
                        "Coordinates must be finite".to_string(),
                    );
                }
            }
        }

        result
    }
}

fn ring_coords(ring: &geo::LineString<f64>) -> Vec<Position> {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

/// GeoJSON-compatible polygonal geometry sent in request bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AreaGeometry {
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
}

impl AreaGeometry {
    /// Create a Polygon geometry from rings, exterior first
    pub fn polygon(rings: Vec<Vec<Position>>) -> Self {
        AreaGeometry::Polygon { coordinates: rings }
    }

    /// Build from a list of polygons: one becomes a Polygon body,
    /// several become a MultiPolygon body.
    pub fn from_polygons(polygons: &[AreaPolygon]) -> Self {
        if polygons.len() == 1 {
            AreaGeometry::Polygon { coordinates: polygons[0].rings.clone() }
        } else {
            AreaGeometry::MultiPolygon {
                coordinates: polygons.iter().map(|p| p.rings.clone()).collect(),
            }
        }
    }

    /// Convert from a `geo` crate multi-polygon
    pub fn from_geo_multi(mp: &geo::MultiPolygon<f64>) -> Self {
        AreaGeometry::MultiPolygon {
            coordinates: mp.iter().map(|p| AreaPolygon::from_geo(p).rings).collect(),
        }
    }

    /// The member polygons, regardless of representation
    pub fn polygons(&self) -> Vec<AreaPolygon> {
        match self {
            AreaGeometry::Polygon { coordinates } => {
                vec![AreaPolygon { rings: coordinates.clone() }]
            }
            AreaGeometry::MultiPolygon { coordinates } => {
                coordinates.iter().map(|rings| AreaPolygon { rings: rings.clone() }).collect()
            }
        }
    }

    /// Validate every member polygon
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::valid();
        for (i, polygon) in self.polygons().iter().enumerate() {
            let poly_result = polygon.validate();
            if !poly_result.is_valid {
                for error in poly_result.errors {
                    result.add_error(format!("[{}].{}", i, error.location), error.reason);
                }
            }
        }
        result
    }
}

impl From<&geo::Polygon<f64>> for AreaGeometry {
    fn from(polygon: &geo::Polygon<f64>) -> Self {
        AreaGeometry::Polygon { coordinates: AreaPolygon::from_geo(polygon).rings }
    }
}

impl From<&geo::MultiPolygon<f64>> for AreaGeometry {
    fn from(mp: &geo::MultiPolygon<f64>) -> Self {
        AreaGeometry::from_geo_multi(mp)
    }
}

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    /// First error as a single "location: reason" line
    pub fn first_error(&self) -> Option<String> {
        self.errors.first().map(|e| format!("{}: {}", e.location, e.reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_square() -> Vec<Position> {
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]
    }

    #[test]
    fn test_closed_ring_is_valid() {
        let polygon = AreaPolygon::new(vec![unit_square()]);
        assert!(polygon.validate().is_valid);
    }

    #[test]
    fn test_short_ring_is_invalid() {
        let polygon = AreaPolygon::new(vec![vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]]);
        let result = polygon.validate();
        assert!(!result.is_valid);
        assert!(result.first_error().unwrap().contains("at least 4 points"));
    }

    #[test]
    fn test_open_ring_is_invalid() {
        let polygon =
            AreaPolygon::new(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]);
        let result = polygon.validate();
        assert!(!result.is_valid);
        assert!(result.first_error().unwrap().contains("closed"));
    }

    #[test]
    fn test_non_finite_coordinate_is_invalid() {
        let mut ring = unit_square();
        ring[2] = [f64::NAN, 1.0];
        let polygon = AreaPolygon::new(vec![ring]);
        assert!(!polygon.validate().is_valid);
    }

    #[test]
    fn test_interior_ring_location_in_error() {
        let polygon = AreaPolygon::new(vec![unit_square(), vec![[0.1, 0.1], [0.2, 0.1]]]);
        let result = polygon.validate();
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].location, "Polygon interior[0]");
    }

    #[test]
    fn test_single_polygon_serializes_as_polygon() {
        let geom = AreaGeometry::from_polygons(&[AreaPolygon::new(vec![unit_square()])]);
        let json = serde_json::to_value(&geom).unwrap();
        assert_eq!(json["type"], "Polygon");
    }

    #[test]
    fn test_many_polygons_serialize_as_multipolygon() {
        let poly = AreaPolygon::new(vec![unit_square()]);
        let geom = AreaGeometry::from_polygons(&[poly.clone(), poly]);
        let json = serde_json::to_value(&geom).unwrap();
        assert_eq!(json["type"], "MultiPolygon");
        assert_eq!(json["coordinates"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_from_geo_polygon_keeps_rings() {
        let exterior = geo::LineString::from(vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 0.0)]);
        let interior =
            geo::LineString::from(vec![(0.5, 0.5), (1.0, 0.5), (1.0, 1.0), (0.5, 0.5)]);
        let polygon = geo::Polygon::new(exterior, vec![interior]);

        let converted = AreaPolygon::from_geo(&polygon);
        assert_eq!(converted.rings.len(), 2);
        assert!(converted.validate().is_valid);
    }

    proptest! {
        /// Any ring that repeats its first point at the end and has at
        /// least 3 distinct finite vertices validates clean.
        #[test]
        fn prop_closed_finite_rings_validate(
            vertices in proptest::collection::vec((-180.0f64..180.0, -90.0f64..90.0), 3..30)
        ) {
            let mut ring: Vec<Position> = vertices.iter().map(|(x, y)| [*x, *y]).collect();
            ring.push(ring[0]);
            let polygon = AreaPolygon::new(vec![ring]);
            prop_assert!(polygon.validate().is_valid);
        }
    }
}
