//! Geofences: named polygonal areas of interest persisted on the server.

use crate::error::{Result, SppError};
use crate::geom::AreaGeometry;
use serde::{Deserialize, Serialize};

/// Enumerated geofence category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GeofenceKind {
    HazardZone,
    ServiceArea,
    TargetingArea,
    #[default]
    Custom,
}

impl GeofenceKind {
    /// Query-parameter form
    pub fn as_str(&self) -> &'static str {
        match self {
            GeofenceKind::HazardZone => "hazard_zone",
            GeofenceKind::ServiceArea => "service_area",
            GeofenceKind::TargetingArea => "targeting_area",
            GeofenceKind::Custom => "custom",
        }
    }
}

/// A geofence to be created, built locally from a selection
#[derive(Debug, Clone)]
pub struct Geofence {
    pub name: String,
    pub description: Option<String>,
    pub kind: GeofenceKind,
    pub geometry: AreaGeometry,
}

impl Geofence {
    pub fn new(name: impl Into<String>, geometry: AreaGeometry) -> Self {
        Self { name: name.into(), description: None, kind: GeofenceKind::Custom, geometry }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_kind(mut self, kind: GeofenceKind) -> Self {
        self.kind = kind;
        self
    }

    /// Client-side validation, applied before any dispatch
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SppError::InvalidArgument {
                reason: "geofence name must not be empty".to_string(),
            });
        }

        let result = self.geometry.validate();
        if !result.is_valid {
            return Err(SppError::InvalidArgument {
                reason: format!(
                    "geofence geometry: {}",
                    result.first_error().unwrap_or_else(|| "invalid ring".to_string())
                ),
            });
        }

        Ok(())
    }

    /// Request body for the geofence create endpoint
    pub fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "name": self.name,
            "geofence_type": self.kind,
            "geometry": self.geometry,
        });
        if let Some(description) = &self.description {
            body["description"] = serde_json::json!(description);
        }
        body
    }
}

/// A geofence as stored on the server, with its assigned identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeofenceRecord {
    pub id: i64,
    pub name: String,
    #[serde(default, rename = "geofence_type")]
    pub kind: GeofenceKind,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Listing filter with paging
#[derive(Debug, Clone)]
pub struct GeofenceFilter {
    pub kind: Option<GeofenceKind>,
    pub active: bool,
    pub count: u32,
    pub offset: u32,
}

impl Default for GeofenceFilter {
    fn default() -> Self {
        Self { kind: None, active: true, count: 100, offset: 0 }
    }
}

impl GeofenceFilter {
    /// Query parameters for the list endpoint
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("_count", self.count.to_string()),
            ("_offset", self.offset.to_string()),
        ];
        if let Some(kind) = self.kind {
            params.push(("geofence_type", kind.as_str().to_string()));
        }
        if !self.active {
            params.push(("active", "false".to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::AreaGeometry;

    fn square() -> AreaGeometry {
        AreaGeometry::polygon(vec![vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
            [0.0, 0.0],
        ]])
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let geofence = Geofence::new("   ", square());
        assert!(matches!(geofence.validate(), Err(SppError::InvalidArgument { .. })));
    }

    #[test]
    fn test_open_ring_is_rejected() {
        let open = AreaGeometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]);
        let geofence = Geofence::new("flood zone", open);
        assert!(geofence.validate().is_err());
    }

    #[test]
    fn test_body_shape() {
        let geofence = Geofence::new("flood zone", square())
            .with_kind(GeofenceKind::HazardZone)
            .with_description("2024 flood extent");

        let body = geofence.to_body();
        assert_eq!(body["name"], "flood zone");
        assert_eq!(body["geofence_type"], "hazard_zone");
        assert_eq!(body["description"], "2024 flood extent");
        assert_eq!(body["geometry"]["type"], "Polygon");
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let record: GeofenceRecord =
            serde_json::from_str(r#"{"id": 7, "name": "flood zone"}"#).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.kind, GeofenceKind::Custom);
        assert!(record.active);
    }

    #[test]
    fn test_filter_query_params() {
        let filter = GeofenceFilter {
            kind: Some(GeofenceKind::ServiceArea),
            active: false,
            count: 25,
            offset: 50,
        };
        let query = filter.to_query();
        assert!(query.contains(&("_count", "25".to_string())));
        assert!(query.contains(&("_offset", "50".to_string())));
        assert!(query.contains(&("geofence_type", "service_area".to_string())));
        assert!(query.contains(&("active", "false".to_string())));
    }
}
