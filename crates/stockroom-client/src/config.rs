//! # Client Configuration
//!
//! Base URL, request timeout, and debounce configuration for the client.
//!
//! ## Resolution Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Configuration Resolution                              │
//! │                                                                         │
//! │  1. Explicit values passed by the caller                               │
//! │  2. Environment variables                                              │
//! │       STOCKROOM_API_URL                                                │
//! │       STOCKROOM_TIMEOUT_SECS                                           │
//! │  3. Config file: <config dir>/stockroom/client.toml                    │
//! │  4. Built-in defaults                                                  │
//! │       base_url  = http://localhost:3000                                │
//! │       timeout   = none (platform default)                              │
//! │       debounce  = 300 ms                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Default API base URL (local development server).
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default debounce window for the search pipeline.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Upper bound on the configurable request timeout.
pub const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// =============================================================================
// Config File Shape
// =============================================================================

/// On-disk configuration (TOML).
///
/// ## Example
/// ```toml
/// api_url = "https://inventory.example.com"
/// timeout_secs = 10
/// debounce_ms = 300
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfigFile {
    /// API base URL.
    pub api_url: Option<String>,
    /// Request timeout in seconds. Absent means no client-side timeout.
    pub timeout_secs: Option<u64>,
    /// Debounce window in milliseconds.
    pub debounce_ms: Option<u64>,
}

impl ClientConfigFile {
    /// Parses a config file from disk.
    pub fn load(path: &Path) -> ClientResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (http or https).
    pub base_url: String,

    /// Request timeout. `None` means no client-side timeout (the platform
    /// default applies).
    pub request_timeout: Option<Duration>,

    /// Debounce window for the search pipeline.
    pub debounce: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl ClientConfig {
    /// Creates a config with the given base URL and defaults elsewhere.
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Sets the request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the debounce window.
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Resolves a config from explicit values, environment, and defaults.
    ///
    /// Explicit values win over `STOCKROOM_API_URL` / `STOCKROOM_TIMEOUT_SECS`,
    /// which win over the built-in defaults.
    pub fn from_env_or(base_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        let base_url = base_url
            .or_else(|| std::env::var("STOCKROOM_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout = timeout_secs
            .or_else(|| {
                std::env::var("STOCKROOM_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
            })
            .map(Duration::from_secs);

        ClientConfig {
            base_url,
            request_timeout,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Resolves a config from the platform config file, environment, and
    /// defaults. Missing file is not an error.
    pub fn load() -> ClientResult<Self> {
        let mut file = ClientConfigFile::default();

        if let Some(path) = Self::config_file_path() {
            if path.exists() {
                debug!(path = %path.display(), "Loading client config file");
                file = ClientConfigFile::load(&path)?;
            }
        }

        let mut config = Self::from_env_or(None, None);

        // File values fill whatever env did not set
        if config.base_url == DEFAULT_BASE_URL {
            if let Some(api_url) = file.api_url {
                config.base_url = api_url;
            }
        }
        if config.request_timeout.is_none() {
            config.request_timeout = file.timeout_secs.map(Duration::from_secs);
        }
        if let Some(ms) = file.debounce_ms {
            config.debounce = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    /// Returns the platform config file path, if a config dir exists.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockroom", "stockroom")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    /// Validates the configuration.
    ///
    /// ## Rules
    /// - Base URL must parse and use http or https
    /// - Request timeout must not exceed [`MAX_REQUEST_TIMEOUT`]
    /// - Debounce must be non-zero
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.base_url)?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidBaseUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }

        if let Some(timeout) = self.request_timeout {
            if timeout > MAX_REQUEST_TIMEOUT {
                return Err(ClientError::InvalidConfig(format!(
                    "request timeout {}s exceeds maximum {}s",
                    timeout.as_secs(),
                    MAX_REQUEST_TIMEOUT.as_secs()
                )));
            }
        }

        if self.debounce.is_zero() {
            return Err(ClientError::InvalidConfig(
                "debounce window must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
