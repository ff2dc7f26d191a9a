//! Human-facing terminal output: styled status lines and tables.

use console::style;
use sppgis_client::{CatalogSnapshot, GeofenceRecord, StatisticsResult};
use std::fmt::Display;
use tabled::{settings::Style, Table, Tabled};

pub fn success(message: impl Display) {
    println!("{} {}", style("✓").green().bold(), message);
}

pub fn error(message: impl Display) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Geometry")]
    geometry: &'static str,
}

pub fn print_catalog(snapshot: &CatalogSnapshot) {
    if snapshot.is_empty() {
        println!("{}", style("(no layers)").dim());
        return;
    }

    let rows: Vec<CatalogRow> = snapshot
        .entries
        .iter()
        .map(|entry| CatalogRow {
            id: entry.id.clone(),
            name: entry.name.clone(),
            category: entry.category.clone(),
            geometry: entry.geometry_type.as_str(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
    println!(
        "{}",
        style(format!(
            "{} layers, fetched {}",
            snapshot.len(),
            snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        ))
        .dim()
    );
}

#[derive(Tabled)]
struct GeofenceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Active")]
    active: bool,
}

pub fn print_geofences(records: &[GeofenceRecord]) {
    if records.is_empty() {
        println!("{}", style("(no geofences)").dim());
        return;
    }

    let rows: Vec<GeofenceRow> = records
        .iter()
        .map(|record| GeofenceRow {
            id: record.id,
            name: record.name.clone(),
            kind: record.kind.as_str(),
            active: record.active,
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn print_statistics(result: &StatisticsResult) {
    println!(
        "{} {}",
        style("Registrants in area:").bold(),
        result.total_count
    );
    if let Some(areas) = result.areas_matched {
        println!("{} {}", style("Areas matched:").bold(), areas);
    }

    if !result.statistics.is_empty() {
        println!();
        for (key, value) in &result.statistics {
            println!("  {}: {}", style(key).cyan(), value);
        }
    }
}
