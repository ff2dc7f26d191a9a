use crate::cli::{
    CatalogArgs, Cli, Commands, ExportArgs, FeaturesArgs, GeofenceArgs, GeofenceCommands,
    GeofenceCreateArgs, GeofenceDeleteArgs, GeofenceListArgs, StatsArgs, StyleArgs,
};
use crate::output;
use anyhow::{bail, Context, Result};
use sppgis_client::{
    AreaGeometry, AreaPolygon, CliProfileOverrides, ConnectionConfig, ConnectionProfile,
    ExportFormat, ExportJob, Geofence, GeofenceFilter, GeofenceKind, SppClient, StatisticsQuery,
    StyleOptions,
};
use std::path::Path;

pub async fn execute(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let mut client = SppClient::with_http()?;

    match cli.command {
        Commands::Test => {
            // Probe with the candidate config before committing it
            match client.test_connection(&config).await {
                Ok(()) => {
                    output::success(&format!("Connected to {}", config.base_url()));
                    Ok(())
                }
                Err(err) => {
                    tracing::debug!(error = %err, "connection test failed");
                    bail!("{}", err.user_message());
                }
            }
        }
        Commands::Catalog(args) => {
            client.set_active_connection(config);
            catalog(&mut client, args, cli.json).await
        }
        Commands::Features(args) => {
            client.set_active_connection(config);
            features(&client, args).await
        }
        Commands::Style(args) => {
            client.set_active_connection(config);
            style(&client, args).await
        }
        Commands::Stats(args) => {
            client.set_active_connection(config);
            stats(&client, args, cli.json).await
        }
        Commands::Geofence(args) => {
            client.set_active_connection(config);
            geofence(&client, args, cli.json).await
        }
        Commands::Export(args) => {
            client.set_active_connection(config);
            export(&client, args).await
        }
    }
}

/// Layer the connection profile: defaults < file < environment < CLI flags
fn resolve_config(cli: &Cli) -> Result<ConnectionConfig> {
    let mut profile = ConnectionProfile::with_defaults();
    if let Some(path) = &cli.profile {
        profile = profile.load_from_file(path)?;
    }
    profile = profile.load_from_env();
    profile.update_from_cli(CliProfileOverrides {
        server_url: cli.url.clone(),
        api_key: cli.api_key.clone(),
        timeout_secs: cli.timeout_secs,
    });

    profile
        .into_config()
        .context("no server URL configured; pass --url, set SPPGIS_URL, or use --profile")
}

async fn catalog(client: &mut SppClient, args: CatalogArgs, json: bool) -> Result<()> {
    let snapshot = client.get_catalog(args.refresh).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&*snapshot)?);
    } else {
        output::print_catalog(&snapshot);
    }
    Ok(())
}

async fn features(client: &SppClient, args: FeaturesArgs) -> Result<()> {
    let collection = client.get_features(&args.id).await?;
    let text = collection.to_string();
    match args.output {
        Some(path) => {
            std::fs::write(&path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            output::success(&format!(
                "Wrote {} features to {}",
                collection.features.len(),
                path.display()
            ));
        }
        None => println!("{}", text),
    }
    Ok(())
}

async fn style(client: &SppClient, args: StyleArgs) -> Result<()> {
    let options = StyleOptions { opacity: args.opacity, field_name: args.field };
    let descriptor = client.get_style(&args.id, &options).await?;
    println!("{}", descriptor.qml);
    Ok(())
}

async fn stats(client: &SppClient, args: StatsArgs, json: bool) -> Result<()> {
    let polygons = load_polygons(&args.geometry)?;
    let query = StatisticsQuery::new(polygons).with_variables(args.variables);
    let result = client.query_statistics(&query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        output::print_statistics(&result);
    }
    Ok(())
}

async fn geofence(client: &SppClient, args: GeofenceArgs, json: bool) -> Result<()> {
    match args.command {
        GeofenceCommands::List(args) => geofence_list(client, args, json).await,
        GeofenceCommands::Create(args) => geofence_create(client, args).await,
        GeofenceCommands::Delete(args) => geofence_delete(client, args).await,
    }
}

async fn geofence_list(client: &SppClient, args: GeofenceListArgs, json: bool) -> Result<()> {
    let filter = GeofenceFilter {
        kind: args.kind.as_deref().map(parse_kind).transpose()?,
        active: !args.inactive,
        count: args.count,
        offset: args.offset,
    };
    let records = client.list_geofences(&filter).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        output::print_geofences(&records);
    }
    Ok(())
}

async fn geofence_create(client: &SppClient, args: GeofenceCreateArgs) -> Result<()> {
    let polygons = load_polygons(&args.geometry)?;
    let mut geofence =
        Geofence::new(args.name, AreaGeometry::from_polygons(&polygons))
            .with_kind(parse_kind(&args.kind)?);
    if let Some(description) = args.description {
        geofence = geofence.with_description(description);
    }

    let record = client.save_geofence(&geofence).await?;
    output::success(&format!("Created geofence '{}' with id {}", record.name, record.id));
    Ok(())
}

async fn geofence_delete(client: &SppClient, args: GeofenceDeleteArgs) -> Result<()> {
    client.delete_geofence(args.id).await?;
    output::success(&format!("Archived geofence {}", args.id));
    Ok(())
}

async fn export(client: &SppClient, args: ExportArgs) -> Result<()> {
    let job = ExportJob {
        format: parse_format(&args.format)?,
        destination: args.destination.clone(),
        layer_ids: args.layers,
        include_geofences: !args.no_geofences,
        admin_level: args.admin_level,
    };

    let bytes = client.export_offline(&job).await?;
    output::success(&format!("Exported {} bytes to {}", bytes, args.destination.display()));
    Ok(())
}

fn parse_kind(s: &str) -> Result<GeofenceKind> {
    match s.to_lowercase().as_str() {
        "hazard_zone" => Ok(GeofenceKind::HazardZone),
        "service_area" => Ok(GeofenceKind::ServiceArea),
        "targeting_area" => Ok(GeofenceKind::TargetingArea),
        "custom" => Ok(GeofenceKind::Custom),
        other => bail!(
            "invalid geofence type '{}'. Use hazard_zone, service_area, targeting_area, or custom",
            other
        ),
    }
}

fn parse_format(s: &str) -> Result<ExportFormat> {
    match s.to_lowercase().as_str() {
        "gpkg" | "geopackage" => Ok(ExportFormat::GeoPackage),
        "zip" => Ok(ExportFormat::Zip),
        other => bail!("invalid export format '{}'. Use gpkg or zip", other),
    }
}

/// Read polygons from a GeoJSON file: a bare geometry, a Feature, or every
/// polygonal feature of a FeatureCollection.
fn load_polygons(path: &Path) -> Result<Vec<AreaPolygon>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let geojson: geojson::GeoJson =
        content.parse().with_context(|| format!("{} is not valid GeoJSON", path.display()))?;

    let mut polygons = Vec::new();
    match geojson {
        geojson::GeoJson::Geometry(geometry) => collect_polygons(&geometry.value, &mut polygons),
        geojson::GeoJson::Feature(feature) => {
            if let Some(geometry) = feature.geometry {
                collect_polygons(&geometry.value, &mut polygons);
            }
        }
        geojson::GeoJson::FeatureCollection(collection) => {
            for feature in collection.features {
                if let Some(geometry) = feature.geometry {
                    collect_polygons(&geometry.value, &mut polygons);
                }
            }
        }
    }

    if polygons.is_empty() {
        bail!("{} contains no Polygon or MultiPolygon geometry", path.display());
    }
    Ok(polygons)
}

fn collect_polygons(value: &geojson::Value, polygons: &mut Vec<AreaPolygon>) {
    match value {
        geojson::Value::Polygon(rings) => polygons.push(rings_to_polygon(rings)),
        geojson::Value::MultiPolygon(multi) => {
            for rings in multi {
                polygons.push(rings_to_polygon(rings));
            }
        }
        _ => {}
    }
}

fn rings_to_polygon(rings: &[Vec<Vec<f64>>]) -> AreaPolygon {
    AreaPolygon::new(
        rings
            .iter()
            .map(|ring| {
                ring.iter()
                    .map(|position| {
                        [position.first().copied().unwrap_or(f64::NAN),
                         position.get(1).copied().unwrap_or(f64::NAN)]
                    })
                    .collect()
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("hazard_zone").unwrap(), GeofenceKind::HazardZone);
        assert_eq!(parse_kind("CUSTOM").unwrap(), GeofenceKind::Custom);
        assert!(parse_kind("other").is_err());
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("gpkg").unwrap(), ExportFormat::GeoPackage);
        assert_eq!(parse_format("geopackage").unwrap(), ExportFormat::GeoPackage);
        assert_eq!(parse_format("ZIP").unwrap(), ExportFormat::Zip);
        assert!(parse_format("shp").is_err());
    }

    #[test]
    fn test_collect_polygons_skips_points() {
        let mut polygons = Vec::new();
        collect_polygons(&geojson::Value::Point(vec![1.0, 2.0]), &mut polygons);
        assert!(polygons.is_empty());

        let ring = vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        ];
        collect_polygons(&geojson::Value::Polygon(vec![ring]), &mut polygons);
        assert_eq!(polygons.len(), 1);
        assert!(polygons[0].validate().is_valid);
    }
}
