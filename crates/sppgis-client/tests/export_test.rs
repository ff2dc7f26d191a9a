//! Offline export: complete file or no file, never a truncated one.

mod common;

use common::{connected_client, ScriptedTransport};
use sppgis_client::{ExportFormat, ExportJob, SppError};

#[tokio::test]
async fn successful_export_writes_the_package() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("offline.gpkg");

    let payload = b"GPKG\x00fake-package-bytes".to_vec();
    let transport = ScriptedTransport::new();
    transport.push_raw(200, payload.clone());
    let client = connected_client(transport.clone());

    let job = ExportJob::new(&destination).with_layers(vec!["boundaries".to_string()]);
    let written = client.export_offline(&job).await.unwrap();

    assert_eq!(written, payload.len() as u64);
    assert_eq!(std::fs::read(&destination).unwrap(), payload);

    let url = transport.request(0).url;
    assert!(url.starts_with("https://spp.example.org/gis/export/geopackage?"));
    assert!(url.contains("format=gpkg"));
    assert!(url.contains("layer_ids=boundaries"));
}

#[tokio::test]
async fn zip_format_lands_in_query() {
    let dir = tempfile::tempdir().unwrap();
    let transport = ScriptedTransport::new();
    transport.push_raw(200, b"PK\x03\x04".to_vec());
    let client = connected_client(transport.clone());

    let job = ExportJob::new(dir.path().join("offline.zip")).with_format(ExportFormat::Zip);
    client.export_offline(&job).await.unwrap();

    assert!(transport.request(0).url.contains("format=zip"));
}

#[tokio::test]
async fn server_failure_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("offline.gpkg");

    let transport = ScriptedTransport::new();
    transport.push_json(500, serde_json::json!({"error": "export failed"}));
    let client = connected_client(transport);

    let err = client.export_offline(&ExportJob::new(&destination)).await.unwrap_err();
    assert!(matches!(err, SppError::Server { .. }));
    assert!(!destination.exists());
}

#[tokio::test]
async fn mid_stream_transport_failure_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("offline.gpkg");

    let transport = ScriptedTransport::new();
    transport.push_err(SppError::Transport { detail: "connection reset mid-body".to_string() });
    let client = connected_client(transport);

    let err = client.export_offline(&ExportJob::new(&destination)).await.unwrap_err();
    assert!(matches!(err, SppError::Transport { .. }));
    assert!(!destination.exists());
}

#[tokio::test]
async fn unwritable_destination_surfaces_io_and_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("missing-subdir").join("offline.gpkg");

    let transport = ScriptedTransport::new();
    transport.push_raw(200, b"GPKG".to_vec());
    let client = connected_client(transport);

    let err = client.export_offline(&ExportJob::new(&destination)).await.unwrap_err();
    assert!(matches!(err, SppError::Io(_)));
    assert!(!destination.exists());
}

#[tokio::test]
async fn empty_destination_fails_without_network() {
    let transport = ScriptedTransport::new();
    let client = connected_client(transport.clone());

    let err = client.export_offline(&ExportJob::new("")).await.unwrap_err();
    assert!(matches!(err, SppError::InvalidArgument { .. }));
    assert_eq!(transport.call_count(), 0);
}
