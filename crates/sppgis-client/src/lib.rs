//! sppgis-client - Thin client for an OpenSPP-style GIS statistics backend
//!
//! Connects a desktop GIS host to a remote geospatial statistics server:
//! API-key authentication, catalog discovery, feature and style retrieval,
//! server-side polygon statistics, geofence persistence, and offline
//! GeoPackage export. All calls are bounded, typed request/response pairs;
//! retry policy belongs to the caller.

pub mod cache;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod geom;
pub mod models;
pub mod state;
pub mod transport;

pub use client::SppClient;
pub use config::{CliProfileOverrides, ConnectionConfig, ConnectionProfile, DEFAULT_TIMEOUT};
pub use error::{Result, SppError};
pub use geom::{AreaGeometry, AreaPolygon};
pub use models::{
    CatalogEntry, CatalogSnapshot, CollectionInfo, ExportFormat, ExportJob, Geofence,
    GeofenceFilter, GeofenceKind, GeofenceRecord, LayerGeometry, StatisticsFilters,
    StatisticsQuery, StatisticsResult, StyleDescriptor, StyleOptions,
};
pub use state::ConnectionStatus;
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, Transport};
