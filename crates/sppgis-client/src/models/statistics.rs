//! Aggregate statistics over caller-supplied polygons.
//!
//! All computation happens server-side; the client validates ring
//! structure, serializes geometry, and decodes the aggregate response.

use crate::error::{Result, SppError};
use crate::geom::{AreaGeometry, AreaPolygon};
use serde::{Deserialize, Serialize};

/// Registrant filters applied server-side to a statistics query
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatisticsFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_group: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    /// Additional server-understood filters, passed through verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A request for aggregate statistics over one or more polygons.
///
/// Stateless value object: built per user action, discarded after the
/// response is shown.
#[derive(Debug, Clone)]
pub struct StatisticsQuery {
    pub polygons: Vec<AreaPolygon>,
    pub filters: Option<StatisticsFilters>,
    /// Server-side computed variable accessors to include
    pub variables: Vec<String>,
}

impl StatisticsQuery {
    pub fn new(polygons: Vec<AreaPolygon>) -> Self {
        Self { polygons, filters: None, variables: Vec::new() }
    }

    /// Build from `geo` crate polygons supplied by the host
    pub fn from_geo(polygons: &[geo::Polygon<f64>]) -> Self {
        Self::new(polygons.iter().map(AreaPolygon::from_geo).collect())
    }

    pub fn with_filters(mut self, filters: StatisticsFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_variables(mut self, variables: Vec<String>) -> Self {
        self.variables = variables;
        self
    }

    /// Client-side validation, applied before any dispatch
    pub fn validate(&self) -> Result<()> {
        if self.polygons.is_empty() {
            return Err(SppError::InvalidArgument {
                reason: "statistics query requires at least one polygon".to_string(),
            });
        }

        for (i, polygon) in self.polygons.iter().enumerate() {
            let result = polygon.validate();
            if !result.is_valid {
                return Err(SppError::InvalidArgument {
                    reason: format!(
                        "polygon {}: {}",
                        i,
                        result.first_error().unwrap_or_else(|| "invalid ring".to_string())
                    ),
                });
            }
        }

        Ok(())
    }

    /// Wire geometry: a single polygon posts as Polygon, several as MultiPolygon
    pub fn geometry(&self) -> AreaGeometry {
        AreaGeometry::from_polygons(&self.polygons)
    }

    /// Request body for the statistics endpoint
    pub fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({ "geometry": self.geometry() });
        if let Some(filters) = &self.filters {
            body["filters"] = serde_json::to_value(filters).unwrap_or(serde_json::Value::Null);
        }
        if !self.variables.is_empty() {
            body["variables"] = serde_json::json!(self.variables);
        }
        body
    }
}

/// Aggregated server response: metric name to value, plus totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsResult {
    pub total_count: u64,
    #[serde(default)]
    pub areas_matched: Option<u64>,
    #[serde(default)]
    pub statistics: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> AreaPolygon {
        AreaPolygon::new(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]])
    }

    #[test]
    fn test_empty_query_is_rejected() {
        let query = StatisticsQuery::new(vec![]);
        assert!(matches!(query.validate(), Err(SppError::InvalidArgument { .. })));
    }

    #[test]
    fn test_open_ring_is_rejected_with_polygon_index() {
        let open = AreaPolygon::new(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]);
        let query = StatisticsQuery::new(vec![square(), open]);
        match query.validate() {
            Err(SppError::InvalidArgument { reason }) => assert!(reason.starts_with("polygon 1")),
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_body_includes_filters_and_variables() {
        let filters = StatisticsFilters { is_group: Some(false), ..Default::default() };
        let query = StatisticsQuery::new(vec![square()])
            .with_filters(filters)
            .with_variables(vec!["registrant.age".to_string()]);

        let body = query.to_body();
        assert_eq!(body["geometry"]["type"], "Polygon");
        assert_eq!(body["filters"]["is_group"], false);
        assert_eq!(body["variables"][0], "registrant.age");
    }

    #[test]
    fn test_body_omits_absent_options() {
        let body = StatisticsQuery::new(vec![square()]).to_body();
        assert!(body.get("filters").is_none());
        assert!(body.get("variables").is_none());
    }

    #[test]
    fn test_result_defaults() {
        let result: StatisticsResult = serde_json::from_str(r#"{"total_count": 42}"#).unwrap();
        assert_eq!(result.total_count, 42);
        assert!(result.areas_matched.is_none());
        assert!(result.statistics.is_empty());
    }
}
