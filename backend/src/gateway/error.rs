//! Error types for gateway operations.
//!
//! Every failure carries an [`ErrorContext`] naming the building and the
//! logical endpoint involved, so a message surfaced to the user (or the log)
//! always says which call broke.

use std::fmt;

use crate::api::BuildingId;
use crate::gateway::Endpoint;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Structured context for gateway errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// Logical endpoint being called
    pub endpoint: Option<Endpoint>,
    /// Building the call was made for, if any
    pub building_id: Option<BuildingId>,
    /// HTTP status returned by the upstream service
    pub status: Option<u16>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint: Some(endpoint),
            ..Default::default()
        }
    }

    pub fn with_building(mut self, id: Option<BuildingId>) -> Self {
        self.building_id = id;
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(endpoint) = self.endpoint {
            parts.push(format!("endpoint={}", endpoint.name()));
        }
        if let Some(id) = self.building_id {
            parts.push(format!("building_id={}", id));
        }
        if let Some(status) = self.status {
            parts.push(format!("status={}", status));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for gateway operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// Transport failure or non-2xx response.
    #[error("Fetch error: {message} {context}")]
    FetchError {
        message: String,
        context: ErrorContext,
    },

    /// The response arrived but does not have the documented shape.
    #[error("Malformed response: {message} {context}")]
    MalformedResponse {
        message: String,
        context: ErrorContext,
    },

    /// Invalid gateway configuration (bad URL, unknown type, ...).
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl GatewayError {
    pub fn fetch(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::FetchError {
            message: message.into(),
            context,
        }
    }

    pub fn malformed(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::MalformedResponse {
            message: message.into(),
            context,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Get the error context, if the error came from a call.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::FetchError { context, .. } | Self::MalformedResponse { context, .. } => {
                Some(context)
            }
            Self::ConfigurationError { .. } => None,
        }
    }

    pub fn endpoint(&self) -> Option<Endpoint> {
        self.context().and_then(|c| c.endpoint)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }

    /// Upstream answered 404 for this call.
    pub fn is_not_found(&self) -> bool {
        self.context().and_then(|c| c.status) == Some(404)
    }

    /// Short message suitable for the user-facing warning or error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::FetchError { context, .. } => match (context.endpoint, context.building_id) {
                (Some(endpoint), Some(id)) => {
                    format!("Failed to fetch {} for Building ID {}", endpoint.description(), id)
                }
                (Some(endpoint), None) => format!("Failed to fetch {}", endpoint.description()),
                _ => self.to_string(),
            },
            Self::MalformedResponse { context, .. } => match context.endpoint {
                Some(endpoint) => {
                    format!("Invalid response from server ({})", endpoint.description())
                }
                None => "Invalid response from server.".to_string(),
            },
            Self::ConfigurationError { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrendSeries;

    #[test]
    fn test_context_display() {
        let ctx = ErrorContext::new(Endpoint::Trend(TrendSeries::Carbon))
            .with_building(BuildingId::new(4))
            .with_status(500);
        assert_eq!(
            ctx.to_string(),
            "[endpoint=carbon_emissions_trends, building_id=4, status=500]"
        );
    }

    #[test]
    fn test_not_found_detection() {
        let err = GatewayError::fetch(
            "HTTP 404",
            ErrorContext::new(Endpoint::Average).with_status(404),
        );
        assert!(err.is_not_found());
        assert!(!err.is_malformed());
        assert_eq!(err.endpoint(), Some(Endpoint::Average));
    }

    #[test]
    fn test_user_message_names_building() {
        let err = GatewayError::fetch(
            "connection refused",
            ErrorContext::new(Endpoint::Trend(TrendSeries::Water)).with_building(BuildingId::new(12)),
        );
        assert_eq!(
            err.user_message(),
            "Failed to fetch water usage trends for Building ID 12"
        );
    }

    #[test]
    fn test_configuration_error_has_no_context() {
        let err = GatewayError::configuration("bad url");
        assert!(err.context().is_none());
        assert_eq!(err.to_string(), "Configuration error: bad url");
    }
}
