//! Credential/connection state: the unit of "connected" vs "disconnected".

use crate::config::ConnectionConfig;

/// Connection status as seen by callers.
///
/// An authentication failure on an individual call is surfaced per-call and
/// does not demote this status; only an explicit swap or disconnect does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connected,
}

/// Holds the active endpoint/credential pair. Single mutation point,
/// whole-value swap only.
#[derive(Debug, Default)]
pub struct ConnectionState {
    active: Option<ConnectionConfig>,
}

impl ConnectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active config atomically
    pub fn set(&mut self, config: ConnectionConfig) {
        self.active = Some(config);
    }

    /// Clear credentials
    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<&ConnectionConfig> {
        self.active.as_ref()
    }

    pub fn status(&self) -> ConnectionStatus {
        if self.active.is_some() {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        }
    }
}
