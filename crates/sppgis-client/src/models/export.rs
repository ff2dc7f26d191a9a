//! Offline export: materialize a subset of layers into a portable file.

use crate::error::{Result, SppError};
use std::path::PathBuf;

/// Supported portable package formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    GeoPackage,
    Zip,
}

impl ExportFormat {
    /// Query-parameter form
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::GeoPackage => "gpkg",
            ExportFormat::Zip => "zip",
        }
    }
}

/// A request to export layers for offline use
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub format: ExportFormat,
    pub destination: PathBuf,
    /// Layer ids to include; empty means all
    pub layer_ids: Vec<String>,
    pub include_geofences: bool,
    pub admin_level: Option<u8>,
}

impl ExportJob {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            format: ExportFormat::GeoPackage,
            destination: destination.into(),
            layer_ids: Vec::new(),
            include_geofences: true,
            admin_level: None,
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_layers(mut self, layer_ids: Vec<String>) -> Self {
        self.layer_ids = layer_ids;
        self
    }

    /// Client-side validation, applied before any dispatch
    pub fn validate(&self) -> Result<()> {
        if self.destination.as_os_str().is_empty() {
            return Err(SppError::InvalidArgument {
                reason: "export destination must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Query parameters for the export endpoint
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("format", self.format.as_str().to_string()),
            ("include_geofences", self.include_geofences.to_string()),
        ];
        if !self.layer_ids.is_empty() {
            params.push(("layer_ids", self.layer_ids.join(",")));
        }
        if let Some(level) = self.admin_level {
            params.push(("admin_level", level.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_destination_is_rejected() {
        let job = ExportJob::new("");
        assert!(matches!(job.validate(), Err(SppError::InvalidArgument { .. })));
    }

    #[test]
    fn test_query_params() {
        let job = ExportJob::new("/tmp/out.gpkg")
            .with_format(ExportFormat::Zip)
            .with_layers(vec!["boundaries".to_string(), "pop_density".to_string()]);

        let query = job.to_query();
        assert!(query.contains(&("format", "zip".to_string())));
        assert!(query.contains(&("include_geofences", "true".to_string())));
        assert!(query.contains(&("layer_ids", "boundaries,pop_density".to_string())));
    }

    #[test]
    fn test_all_layers_omits_layer_ids() {
        let query = ExportJob::new("/tmp/out.gpkg").to_query();
        assert!(!query.iter().any(|(k, _)| *k == "layer_ids"));
    }
}
