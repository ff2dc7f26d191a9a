pub mod catalog;
pub mod export;
pub mod geofence;
pub mod statistics;

pub use catalog::{CatalogEntry, CatalogSnapshot, CollectionInfo, LayerGeometry, StyleDescriptor, StyleOptions};
pub use export::{ExportFormat, ExportJob};
pub use geofence::{Geofence, GeofenceFilter, GeofenceKind, GeofenceRecord};
pub use statistics::{StatisticsFilters, StatisticsQuery, StatisticsResult};
