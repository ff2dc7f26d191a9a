//! Shared test doubles: scripted and never-completing transports.
#![allow(dead_code)]

use async_trait::async_trait;
use sppgis_client::{
    ApiRequest, ConnectionConfig, RawResponse, Result, SppClient, SppError, Transport,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Records every request and replays queued responses in order.
pub struct ScriptedTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<Result<RawResponse>>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { requests: Mutex::new(Vec::new()), responses: Mutex::new(VecDeque::new()) })
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_raw(status, body.to_string().into_bytes());
    }

    pub fn push_raw(&self, status: u16, body: Vec<u8>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse { status, headers: Vec::new(), body }));
    }

    pub fn push_err(&self, err: SppError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> ApiRequest {
        self.requests.lock().unwrap()[index].clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests.lock().unwrap().last().expect("no request recorded").clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(SppError::Transport { detail: "no scripted response".to_string() })
        })
    }
}

/// A transport whose requests never complete; only the client deadline
/// can end a call.
pub struct PendingTransport;

#[async_trait]
impl Transport for PendingTransport {
    async fn execute(&self, _request: ApiRequest) -> Result<RawResponse> {
        std::future::pending().await
    }
}

pub fn test_config() -> ConnectionConfig {
    ConnectionConfig::new("https://spp.example.org", "sk-test").unwrap()
}

/// A client wired to the given transport with an active test connection
pub fn connected_client(transport: Arc<dyn Transport>) -> SppClient {
    let mut client = SppClient::new(transport);
    client.set_active_connection(test_config());
    client
}

/// The catalog payload used across catalog tests
pub fn boundaries_catalog() -> serde_json::Value {
    serde_json::json!({
        "collections": [
            {
                "id": "boundaries",
                "name": "Admin Boundaries",
                "category": "Admin",
                "geometry_type": "polygon"
            }
        ]
    })
}
