//! Gateway factory for dependency injection.
//!
//! Creates the gateway implementation selected by configuration.

use std::str::FromStr;
use std::sync::Arc;

use super::config::DashboardConfig;
use super::error::GatewayResult;
use super::http::HttpGateway;
use super::local::LocalGateway;
use super::DashboardGateway;

/// Gateway type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayType {
    /// Real backends over HTTP
    Http,
    /// In-memory gateway
    Local,
}

impl FromStr for GatewayType {
    type Err = String;

    /// Parse gateway type from string ("http", "remote", "local", "memory").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" | "remote" => Ok(Self::Http),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown gateway type: {}", s)),
        }
    }
}

/// Gateway factory for creating gateway instances.
///
/// # Example
/// ```ignore
/// use sdash_rust::gateway::{DashboardConfig, GatewayFactory};
///
/// let config = DashboardConfig::load()?;
/// let gateway = GatewayFactory::create(&config)?;
/// let roster = gateway.list_buildings().await?;
/// ```
pub struct GatewayFactory;

impl GatewayFactory {
    /// Create the gateway selected by `config.gateway.type`.
    pub fn create(config: &DashboardConfig) -> GatewayResult<Arc<dyn DashboardGateway>> {
        match config.gateway_type()? {
            GatewayType::Http => {
                let gateway = HttpGateway::new(&config.backends)?;
                Ok(Arc::new(gateway))
            }
            GatewayType::Local => Ok(Self::create_local()),
        }
    }

    /// Create an empty in-memory gateway.
    pub fn create_local() -> Arc<dyn DashboardGateway> {
        Arc::new(LocalGateway::new())
    }
}
