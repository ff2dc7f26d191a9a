use crate::error::{Result, SppError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default bounded wait for a single request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A server endpoint plus credential pair.
///
/// Replaced wholesale on reconnect; never mutated field by field, so every
/// request issued between two swaps uses exactly one URL/key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl ConnectionConfig {
    /// Create a config, validating the endpoint URL.
    ///
    /// The URL must be non-empty and scheme-qualified (`http://` or
    /// `https://`); a trailing slash is trimmed so endpoint paths can be
    /// appended verbatim.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');

        if trimmed.is_empty() {
            return Err(SppError::InvalidArgument {
                reason: "server URL must not be empty".to_string(),
            });
        }
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(SppError::InvalidArgument {
                reason: format!("server URL must start with http:// or https://, got '{}'", trimmed),
            });
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Host portion of the base URL, for diagnostics
    pub fn host(&self) -> &str {
        host_of(&self.base_url)
    }
}

/// Host portion of a scheme-qualified URL
pub(crate) fn host_of(url: &str) -> &str {
    let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let rest = rest.split(['/', '?']).next().unwrap_or(rest);
    rest.split(':').next().unwrap_or(rest)
}

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from profile file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered connection profile: defaults < profile file < environment.
///
/// Hosts with their own connection dialogs build a `ConnectionConfig`
/// directly; the CLI and scripts load a profile through this type.
#[derive(Debug, Clone)]
pub struct ConnectionProfile {
    pub server_url: ConfigValue<String>,
    pub api_key: ConfigValue<String>,
    pub timeout_secs: ConfigValue<u64>,
}

impl ConnectionProfile {
    /// Create a profile with default values
    pub fn with_defaults() -> Self {
        Self {
            server_url: ConfigValue::new(String::new(), ConfigSource::Default),
            api_key: ConfigValue::new(String::new(), ConfigSource::Default),
            timeout_secs: ConfigValue::new(DEFAULT_TIMEOUT.as_secs(), ConfigSource::Default),
        }
    }

    /// Load profile values from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| SppError::InvalidArgument {
            reason: format!("failed to read profile file: {}", e),
        })?;

        let file_profile: FileProfile =
            toml::from_str(&content).map_err(|e| SppError::InvalidArgument {
                reason: format!("failed to parse profile TOML: {}", e),
            })?;

        if let Some(server_url) = file_profile.server_url {
            self.server_url.update(server_url, ConfigSource::File);
        }
        if let Some(api_key) = file_profile.api_key {
            self.api_key.update(api_key, ConfigSource::File);
        }
        if let Some(timeout_secs) = file_profile.timeout_secs {
            self.timeout_secs.update(timeout_secs, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load profile values from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(url) = env::var("SPPGIS_URL") {
            self.server_url.update(url, ConfigSource::Environment);
        }

        if let Ok(key) = env::var("SPPGIS_API_KEY") {
            self.api_key.update(key, ConfigSource::Environment);
        }

        if let Ok(timeout_str) = env::var("SPPGIS_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>() {
                Ok(secs) => self.timeout_secs.update(secs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid SPPGIS_TIMEOUT_SECS value '{}': expected integer seconds",
                    timeout_str
                ),
            }
        }

        self
    }

    /// Apply CLI argument overrides
    pub fn update_from_cli(&mut self, overrides: CliProfileOverrides) {
        if let Some(server_url) = overrides.server_url {
            self.server_url.update(server_url, ConfigSource::Cli);
        }
        if let Some(api_key) = overrides.api_key {
            self.api_key.update(api_key, ConfigSource::Cli);
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs.update(timeout_secs, ConfigSource::Cli);
        }
    }

    /// Resolve into a validated `ConnectionConfig`
    pub fn into_config(self) -> Result<ConnectionConfig> {
        Ok(ConnectionConfig::new(self.server_url.value, self.api_key.value)?
            .with_timeout(Duration::from_secs(self.timeout_secs.value)))
    }
}

/// CLI profile overrides
#[derive(Debug, Default)]
pub struct CliProfileOverrides {
    pub server_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Profile loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileProfile {
    server_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}
