//! Dashboard configuration file support.
//!
//! Reads backend locations from a TOML file and lets environment variables
//! override individual settings:
//!
//! ```toml
//! [gateway]
//! type = "http"            # or "local"
//!
//! [backends]
//! buildings_url = "http://127.0.0.1:5000"
//! sustainability_url = "http://127.0.0.1:3001"
//! request_timeout_secs = 30   # 0 disables the timeout
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use super::error::{GatewayError, GatewayResult};
use super::factory::GatewayType;
use super::Backend;

pub const ENV_GATEWAY: &str = "SDASH_GATEWAY";
pub const ENV_BUILDINGS_URL: &str = "SDASH_BUILDINGS_URL";
pub const ENV_SUSTAINABILITY_URL: &str = "SDASH_SUSTAINABILITY_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SDASH_REQUEST_TIMEOUT_SECS";

/// Dashboard configuration from file and environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub backends: BackendSettings,
}

/// Gateway implementation selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySettings {
    #[serde(rename = "type", default = "default_gateway_type")]
    pub gateway_type: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            gateway_type: default_gateway_type(),
        }
    }
}

/// Base URLs of the two logical backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_buildings_url")]
    pub buildings_url: String,
    #[serde(default = "default_sustainability_url")]
    pub sustainability_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            buildings_url: default_buildings_url(),
            sustainability_url: default_sustainability_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_gateway_type() -> String {
    "http".to_string()
}

fn default_buildings_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_sustainability_url() -> String {
    "http://127.0.0.1:3001".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl BackendSettings {
    pub fn base_url(&self, backend: Backend) -> &str {
        match backend {
            Backend::Buildings => &self.buildings_url,
            Backend::Sustainability => &self.sustainability_url,
        }
    }

    /// `None` when the timeout is disabled (a stalled call then never ends).
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(DashboardConfig)` if successful
    /// * `Err(GatewayError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> GatewayResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            GatewayError::configuration(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content).map_err(|e| {
            GatewayError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// First `dashboard.toml` found in the standard locations:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn default_location() -> Option<PathBuf> {
        [
            PathBuf::from("dashboard.toml"),
            PathBuf::from("backend/dashboard.toml"),
            PathBuf::from("../dashboard.toml"),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Load configuration from the default location.
    pub fn from_default_location() -> GatewayResult<Self> {
        match Self::default_location() {
            Some(path) => Self::from_file(&path),
            None => Err(GatewayError::configuration(
                "No dashboard.toml found in standard locations",
            )),
        }
    }

    /// Default-location file if present, built-in defaults otherwise, then
    /// environment overrides on top. The result is validated.
    pub fn load() -> GatewayResult<Self> {
        Self::load_from(Self::default_location().as_deref())
    }

    /// Like [`load`](Self::load) with an explicit file. A file that exists
    /// but cannot be read or parsed is an error, never a silent fallback.
    pub fn load_from(path: Option<&Path>) -> GatewayResult<Self> {
        let mut config = match path {
            Some(path) => {
                log::info!("Loading gateway configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => {
                log::debug!("No dashboard.toml found, using built-in defaults");
                Self::default()
            }
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from `SDASH_*` environment variables.
    pub fn apply_env_overrides(&mut self) -> GatewayResult<()> {
        if let Ok(value) = std::env::var(ENV_GATEWAY) {
            self.gateway.gateway_type = value;
        }
        if let Ok(value) = std::env::var(ENV_BUILDINGS_URL) {
            self.backends.buildings_url = value;
        }
        if let Ok(value) = std::env::var(ENV_SUSTAINABILITY_URL) {
            self.backends.sustainability_url = value;
        }
        if let Ok(value) = std::env::var(ENV_REQUEST_TIMEOUT_SECS) {
            self.backends.request_timeout_secs = value.trim().parse().map_err(|_| {
                GatewayError::configuration(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    ENV_REQUEST_TIMEOUT_SECS, value
                ))
            })?;
        }
        Ok(())
    }

    pub fn gateway_type(&self) -> GatewayResult<GatewayType> {
        GatewayType::from_str(&self.gateway.gateway_type).map_err(GatewayError::configuration)
    }

    /// Check the gateway type and, for the HTTP gateway, both base URLs.
    pub fn validate(&self) -> GatewayResult<()> {
        if self.gateway_type()? != GatewayType::Http {
            return Ok(());
        }
        for (name, url) in [
            ("buildings_url", &self.backends.buildings_url),
            ("sustainability_url", &self.backends.sustainability_url),
        ] {
            let parsed = reqwest::Url::parse(url).map_err(|e| {
                GatewayError::configuration(format!("Invalid {} {:?}: {}", name, url, e))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(GatewayError::configuration(format!(
                    "{} must use http or https, got {:?}",
                    name, url
                )));
            }
        }
        Ok(())
    }
}
