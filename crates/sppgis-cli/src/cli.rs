use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sppgis - client for an OpenSPP-style GIS statistics backend
#[derive(Parser, Debug)]
#[command(name = "sppgis")]
#[command(about = "Client for an OpenSPP-style GIS statistics backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Server base URL (overrides profile and environment)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// API key (overrides profile and environment)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Connection profile file (TOML)
    #[arg(long, global = true)]
    pub profile: Option<PathBuf>,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test the connection to the server
    Test,

    /// List the catalog of browsable layers
    Catalog(CatalogArgs),

    /// Fetch the features of one layer as GeoJSON
    Features(FeaturesArgs),

    /// Fetch the style rules (QML) of one layer
    Style(StyleArgs),

    /// Query aggregate statistics over polygon areas
    Stats(StatsArgs),

    /// Manage geofences
    Geofence(GeofenceArgs),

    /// Export layers to a portable offline package
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
pub struct CatalogArgs {
    /// Bypass the session cache and fetch fresh data
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Parser, Debug)]
pub struct FeaturesArgs {
    /// Catalog layer id
    pub id: String,

    /// Write the GeoJSON to a file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct StyleArgs {
    /// Catalog layer id
    pub id: String,

    /// Layer opacity baked into the returned rules
    #[arg(long, default_value = "0.7")]
    pub opacity: f64,

    /// Field to symbolize
    #[arg(long)]
    pub field: Option<String>,
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Path to a GeoJSON file with a Polygon or MultiPolygon geometry
    pub geometry: PathBuf,

    /// Server-side computed variable accessors to include
    #[arg(long, value_delimiter = ',')]
    pub variables: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct GeofenceArgs {
    #[command(subcommand)]
    pub command: GeofenceCommands,
}

#[derive(Subcommand, Debug)]
pub enum GeofenceCommands {
    /// List saved geofences
    List(GeofenceListArgs),

    /// Create a geofence from a GeoJSON geometry file
    Create(GeofenceCreateArgs),

    /// Archive a geofence
    Delete(GeofenceDeleteArgs),
}

#[derive(Parser, Debug)]
pub struct GeofenceListArgs {
    /// Filter by type (hazard_zone, service_area, targeting_area, custom)
    #[arg(long, value_name = "TYPE")]
    pub kind: Option<String>,

    /// Include archived geofences
    #[arg(long)]
    pub inactive: bool,

    /// Page size
    #[arg(long, default_value = "100")]
    pub count: u32,

    /// Pagination offset
    #[arg(long, default_value = "0")]
    pub offset: u32,
}

#[derive(Parser, Debug)]
pub struct GeofenceCreateArgs {
    /// Geofence name
    pub name: String,

    /// Path to a GeoJSON file with a Polygon or MultiPolygon geometry
    pub geometry: PathBuf,

    /// Type (hazard_zone, service_area, targeting_area, custom)
    #[arg(long, value_name = "TYPE", default_value = "custom")]
    pub kind: String,

    /// Optional description
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Parser, Debug)]
pub struct GeofenceDeleteArgs {
    /// Geofence id to archive
    pub id: i64,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Destination file path
    pub destination: PathBuf,

    /// Layer ids to include (all when omitted)
    #[arg(long, value_delimiter = ',')]
    pub layers: Vec<String>,

    /// Package format (gpkg or zip)
    #[arg(long, default_value = "gpkg")]
    pub format: String,

    /// Exclude geofences from the package
    #[arg(long)]
    pub no_geofences: bool,

    /// Filter by admin level
    #[arg(long)]
    pub admin_level: Option<u8>,
}
