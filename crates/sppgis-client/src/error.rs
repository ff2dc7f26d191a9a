//! Error types for the sppgis client

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SppError {
    // Transport-level failures
    #[error("Connection refused by {url}")]
    ConnectionRefused { url: String },

    #[error("Could not resolve host: {host}")]
    HostUnresolved { host: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Transport failure: {detail}")]
    Transport { detail: String },

    // Response-level failures
    #[error("Malformed server response: {detail}")]
    MalformedResponse { detail: String },

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Request rejected by server ({status}): {message}")]
    ClientRequest { status: u16, message: String },

    #[error("Server error ({status})")]
    Server { status: u16 },

    // Client-side validation, raised before any dispatch
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // IO errors (offline export file writes)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SppError {
    /// Stable, human-readable message for each error kind.
    ///
    /// The raw diagnostic text carried by some variants is meant for logs;
    /// this is the string a host application shows to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            SppError::ConnectionRefused { .. } => "Connection refused. Is the server running?",
            SppError::HostUnresolved { .. } => "Server not found. Please check the URL.",
            SppError::Timeout => "The server did not respond in time.",
            SppError::Transport { .. } => "A network error occurred. Please check your connection.",
            SppError::MalformedResponse { .. } => {
                "The server returned an unexpected response. It may not be a compatible GIS server."
            }
            SppError::AuthenticationFailed => {
                "Authentication failed. Please check your API key and its scopes."
            }
            SppError::NotFound { .. } => "The requested layer or resource does not exist.",
            SppError::ClientRequest { .. } => "The server rejected the request.",
            SppError::Server { .. } => "The server encountered an internal error.",
            SppError::InvalidArgument { .. } => "The request is invalid and was not sent.",
            SppError::Io(_) => "Could not write the output file.",
        }
    }
}

pub type Result<T> = std::result::Result<T, SppError>;
