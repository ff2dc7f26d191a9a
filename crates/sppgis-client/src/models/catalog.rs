//! Catalog entities: the set of layers the server exposes for browsing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geometry class of a catalog layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayerGeometry {
    Point,
    Line,
    Polygon,
    /// Absent or unrecognized value in the catalog payload
    #[default]
    #[serde(other)]
    Unset,
}

impl LayerGeometry {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerGeometry::Point => "point",
            LayerGeometry::Line => "line",
            LayerGeometry::Polygon => "polygon",
            LayerGeometry::Unset => "-",
        }
    }
}

/// One discoverable layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub geometry_type: LayerGeometry,
}

/// The full set of catalog entries at one point in time.
///
/// Atomic: a failed fetch never replaces a prior valid snapshot. Shared as
/// `Arc<CatalogSnapshot>` so repeat cache hits hand back the same object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    pub entries: Vec<CatalogEntry>,
    pub fetched_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries, fetched_at: Utc::now() }
    }

    /// Look up an entry by id
    pub fn entry(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Metadata for a single collection, as served by the collection endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub extent: Option<serde_json::Value>,
    #[serde(default, rename = "itemType")]
    pub item_type: Option<String>,
}

/// Opaque style-rule payload (QML) scoped to one collection
#[derive(Debug, Clone)]
pub struct StyleDescriptor {
    pub collection_id: String,
    pub qml: String,
}

/// Parameters for a style fetch
#[derive(Debug, Clone)]
pub struct StyleOptions {
    /// Layer opacity baked into the returned rules
    pub opacity: f64,
    /// Field to symbolize, server default when unset
    pub field_name: Option<String>,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self { opacity: 0.7, field_name: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_defaults_for_optional_fields() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"id": "boundaries", "name": "Admin Boundaries"}"#).unwrap();
        assert_eq!(entry.category, "");
        assert_eq!(entry.geometry_type, LayerGeometry::Unset);
    }

    #[test]
    fn test_unknown_geometry_type_maps_to_unset() {
        let entry: CatalogEntry = serde_json::from_str(
            r#"{"id": "x", "name": "X", "geometry_type": "surface"}"#,
        )
        .unwrap();
        assert_eq!(entry.geometry_type, LayerGeometry::Unset);
    }

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = CatalogSnapshot::new(vec![CatalogEntry {
            id: "boundaries".to_string(),
            name: "Admin Boundaries".to_string(),
            category: "Admin".to_string(),
            geometry_type: LayerGeometry::Polygon,
        }]);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.entry("boundaries").unwrap().name, "Admin Boundaries");
        assert!(snapshot.entry("missing").is_none());
    }
}
