//! The API client: one method per remote capability.
//!
//! Every operation follows the same pattern: build a request, hand it to
//! the transport under a hard deadline, decode the raw response against the
//! shape that endpoint family promises, and map it onto a typed entity.
//! The client owns the active connection config and the catalog cache; both
//! are replaced by whole-value swap. No operation retries automatically.

use crate::cache::CatalogCache;
use crate::config::ConnectionConfig;
use crate::decode::{self, ExpectedShape};
use crate::error::{Result, SppError};
use crate::models::{
    CatalogEntry, CatalogSnapshot, CollectionInfo, ExportJob, Geofence, GeofenceFilter,
    GeofenceRecord, StatisticsQuery, StatisticsResult, StyleDescriptor, StyleOptions,
};
use crate::state::{ConnectionState, ConnectionStatus};
use crate::transport::{ApiRequest, Method, RawResponse, Transport};
use std::sync::Arc;

const USER_AGENT: &str = concat!("sppgis-client/", env!("CARGO_PKG_VERSION"));

pub struct SppClient {
    transport: Arc<dyn Transport>,
    state: ConnectionState,
    catalog: CatalogCache,
}

impl SppClient {
    /// Create a client over an injected transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport, state: ConnectionState::new(), catalog: CatalogCache::new() }
    }

    /// Create a client over the production HTTP transport
    pub fn with_http() -> Result<Self> {
        Ok(Self::new(Arc::new(crate::transport::HttpTransport::new()?)))
    }

    /// Host-lifecycle entry point: reset to a pristine disconnected state
    pub fn initialize(&mut self) {
        self.state.clear();
        self.catalog.invalidate();
        tracing::debug!("client initialized");
    }

    /// Host-lifecycle exit point: release the cached snapshot and clear
    /// credentials deterministically
    pub fn shutdown(&mut self) {
        self.catalog.invalidate();
        self.state.clear();
        tracing::debug!("client shut down");
    }

    pub fn status(&self) -> ConnectionStatus {
        self.state.status()
    }

    // === Connection lifecycle ===

    /// Probe the landing endpoint with a candidate config.
    ///
    /// Does not mutate client state: the UI verifies a config here before
    /// committing it via [`set_active_connection`](Self::set_active_connection).
    pub async fn test_connection(&self, config: &ConnectionConfig) -> Result<()> {
        let raw = self.dispatch_with(config, Method::Get, "/gis/ogc/", &[], None).await?;
        decode::decode_json(&raw, ExpectedShape::ObjectWithKeys(&["title", "links"]), "landing page")?;
        Ok(())
    }

    /// Replace the active connection atomically and invalidate the catalog
    pub fn set_active_connection(&mut self, config: ConnectionConfig) {
        tracing::info!(url = config.base_url(), "active connection replaced");
        self.state.set(config);
        self.catalog.invalidate();
    }

    /// Clear credentials and cached catalog
    pub fn disconnect(&mut self) {
        tracing::info!("disconnected");
        self.state.clear();
        self.catalog.invalidate();
    }

    /// Conformance classes declared by the server
    pub async fn conformance(&self) -> Result<Vec<String>> {
        let raw = self.dispatch(Method::Get, "/gis/ogc/conformance", &[], None).await?;
        let mut value =
            decode::decode_json(&raw, ExpectedShape::ObjectWithKeys(&["conformsTo"]), "conformance")?;
        decode::decode_as(value["conformsTo"].take(), "conformance")
    }

    // === Catalog ===

    /// The catalog of browsable layers.
    ///
    /// Returns the memoized snapshot unless `force_refresh` is set or no
    /// snapshot exists. A failed fetch leaves the prior snapshot untouched.
    pub async fn get_catalog(&mut self, force_refresh: bool) -> Result<Arc<CatalogSnapshot>> {
        if !force_refresh {
            if let Some(snapshot) = self.catalog.get() {
                return Ok(snapshot);
            }
        }

        let raw = self.dispatch(Method::Get, "/gis/ogc/collections", &[], None).await?;
        let mut value =
            decode::decode_json(&raw, ExpectedShape::ObjectWithKeys(&["collections"]), "catalog")?;
        let entries: Vec<CatalogEntry> = decode::decode_as(value["collections"].take(), "catalog")?;

        tracing::debug!(layers = entries.len(), "catalog refreshed");
        Ok(self.catalog.store(CatalogSnapshot::new(entries)))
    }

    /// Metadata for one collection; an unknown id surfaces the server's NotFound
    pub async fn get_collection_metadata(&self, id: &str) -> Result<CollectionInfo> {
        let path = format!("/gis/ogc/collections/{}", id);
        let raw = self.dispatch(Method::Get, &path, &[], None).await?;
        let value = decode::decode_json(
            &raw,
            ExpectedShape::ObjectWithKeys(&["id"]),
            &format!("collection '{}'", id),
        )?;
        decode::decode_as(value, &format!("collection '{}'", id))
    }

    /// All features of one collection as GeoJSON
    pub async fn get_features(&self, id: &str) -> Result<geojson::FeatureCollection> {
        let path = format!("/gis/ogc/collections/{}/items", id);
        let raw = self.dispatch(Method::Get, &path, &[], None).await?;
        let value = decode::decode_json(
            &raw,
            ExpectedShape::ObjectWithKeys(&["type", "features"]),
            &format!("features of '{}'", id),
        )?;
        geojson::FeatureCollection::try_from(value).map_err(|e| SppError::MalformedResponse {
            detail: format!("features of '{}': not valid GeoJSON: {}", id, e),
        })
    }

    /// A single feature by id
    pub async fn get_feature(&self, id: &str, fid: &str) -> Result<geojson::Feature> {
        let path = format!("/gis/ogc/collections/{}/items/{}", id, fid);
        let raw = self.dispatch(Method::Get, &path, &[], None).await?;
        let value = decode::decode_json(
            &raw,
            ExpectedShape::ObjectWithKeys(&["type", "geometry", "properties"]),
            &format!("feature '{}/{}'", id, fid),
        )?;
        geojson::Feature::try_from(value).map_err(|e| SppError::MalformedResponse {
            detail: format!("feature '{}/{}': not valid GeoJSON: {}", id, fid, e),
        })
    }

    /// Style rules (QML) for one collection
    pub async fn get_style(&self, id: &str, options: &StyleOptions) -> Result<StyleDescriptor> {
        let mut query = vec![("opacity", options.opacity.to_string())];
        if let Some(field) = &options.field_name {
            query.push(("field_name", field.clone()));
        }

        let path = format!("/gis/ogc/collections/{}/qml", id);
        let raw = self.dispatch(Method::Get, &path, &query, None).await?;
        let body = decode::decode_raw(raw, &format!("style of '{}'", id))?;
        let qml = String::from_utf8(body).map_err(|_| SppError::MalformedResponse {
            detail: format!("style of '{}': body is not UTF-8", id),
        })?;

        Ok(StyleDescriptor { collection_id: id.to_string(), qml })
    }

    // === Statistics ===

    /// Aggregate statistics over the query's polygons.
    ///
    /// Ring validation happens before dispatch: an invalid query produces
    /// zero network calls.
    pub async fn query_statistics(&self, query: &StatisticsQuery) -> Result<StatisticsResult> {
        query.validate()?;

        let raw = self
            .dispatch(Method::Post, "/gis/query/statistics", &[], Some(query.to_body()))
            .await?;
        let value = decode::decode_json(
            &raw,
            ExpectedShape::ObjectWithKeys(&["total_count"]),
            "statistics",
        )?;
        decode::decode_as(value, "statistics")
    }

    // === Geofences ===

    /// Persist a geofence; returns the record with its server-assigned id
    pub async fn save_geofence(&self, geofence: &Geofence) -> Result<GeofenceRecord> {
        geofence.validate()?;

        let raw =
            self.dispatch(Method::Post, "/gis/geofences", &[], Some(geofence.to_body())).await?;
        let value = decode::decode_json(&raw, ExpectedShape::ObjectWithKeys(&["id"]), "geofence")?;
        decode::decode_as(value, "geofence")
    }

    /// List saved geofences; no caching
    pub async fn list_geofences(&self, filter: &GeofenceFilter) -> Result<Vec<GeofenceRecord>> {
        let query = filter.to_query();
        let raw = self.dispatch(Method::Get, "/gis/geofences", &query, None).await?;
        let mut value =
            decode::decode_json(&raw, ExpectedShape::ObjectWithKeys(&["geofences"]), "geofences")?;
        decode::decode_as(value["geofences"].take(), "geofences")
    }

    /// Archive a geofence
    pub async fn delete_geofence(&self, id: i64) -> Result<()> {
        let path = format!("/gis/geofences/{}", id);
        let raw = self.dispatch(Method::Delete, &path, &[], None).await?;
        decode::decode_raw(raw, &format!("geofence {}", id))?;
        Ok(())
    }

    // === Offline export ===

    /// Fetch an offline package and write it to the job's destination.
    ///
    /// Returns the number of bytes written. On any write failure the
    /// partial file is removed before the error is surfaced, so a file at
    /// the destination is always a complete package.
    pub async fn export_offline(&self, job: &ExportJob) -> Result<u64> {
        job.validate()?;

        let query = job.to_query();
        let raw = self.dispatch(Method::Get, "/gis/export/geopackage", &query, None).await?;
        let body = decode::decode_raw(raw, "export package")?;
        let size = body.len() as u64;

        if let Err(e) = tokio::fs::write(&job.destination, &body).await {
            let _ = tokio::fs::remove_file(&job.destination).await;
            tracing::warn!(path = %job.destination.display(), "export write failed, partial file removed");
            return Err(SppError::Io(e));
        }

        tracing::info!(path = %job.destination.display(), bytes = size, "export written");
        Ok(size)
    }

    // === Request plumbing ===

    fn active(&self) -> Result<&ConnectionConfig> {
        self.state.active().ok_or_else(|| SppError::InvalidArgument {
            reason: "no active connection; call set_active_connection first".to_string(),
        })
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<RawResponse> {
        let config = self.active()?;
        self.dispatch_with(config, method, path, query, body).await
    }

    /// One bounded request against an explicit config.
    ///
    /// The deadline wraps the whole transport future; when it fires the
    /// in-flight request is dropped and the call fails with `Timeout`.
    async fn dispatch_with(
        &self,
        config: &ConnectionConfig,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<RawResponse> {
        let request = build_request(config, method, path, query, body)?;
        tracing::debug!(method = method.as_str(), url = request.url, "dispatch");

        match tokio::time::timeout(config.timeout(), self.transport.execute(request)).await {
            Ok(result) => {
                if let Err(err) = &result {
                    tracing::warn!(method = method.as_str(), path, error = %err, "request failed");
                }
                result
            }
            Err(_) => {
                tracing::warn!(method = method.as_str(), path, "request timed out");
                Err(SppError::Timeout)
            }
        }
    }
}

/// Build the full request: URL with query string, standard headers, and the
/// bearer credential from the given config (omitted when the key is empty).
fn build_request(
    config: &ConnectionConfig,
    method: Method,
    path: &str,
    query: &[(&str, String)],
    body: Option<serde_json::Value>,
) -> Result<ApiRequest> {
    let mut url = format!("{}{}", config.base_url(), path);
    if !query.is_empty() {
        let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        url.push('?');
        url.push_str(&pairs.join("&"));
    }

    let mut headers = vec![("User-Agent".to_string(), USER_AGENT.to_string())];
    if !config.api_key().is_empty() {
        headers.push(("Authorization".to_string(), format!("Bearer {}", config.api_key())));
    }

    let body = match body {
        Some(value) => {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
            Some(serde_json::to_vec(&value).map_err(|e| SppError::InvalidArgument {
                reason: format!("failed to serialize request body: {}", e),
            })?)
        }
        None => None,
    };

    Ok(ApiRequest { method, url, headers, body })
}
