//! Typed error handling for the export API
//!
//! Every failure a request can run into maps onto one [`ExportError`]
//! variant, and each variant knows how it is framed on the wire.
//!
//! # Framing
//!
//! - [`ExportError::AccessDenied`]: status 200, JSON `{"error": "Access denied"}`
//! - [`ExportError::RouteNotFound`]: status 200, plain text `Not provided.`
//! - everything else: status 500, JSON [`ErrorResponse`]
//!
//! The first two keep the framing existing migration consumers rely on.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// Body written for unrecognized routes
pub const NOT_PROVIDED_BODY: &str = "Not provided.";

/// Message carried by the authorization failure body
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied";

/// The main error type for the export API
#[derive(Debug)]
pub enum ExportError {
    /// Missing, inactive or mismatched API key
    AccessDenied,

    /// Non-empty route that matches no exporter
    RouteNotFound { route: String },

    /// A host collaborator failed while building a page
    Upstream { entity: String, message: String },

    /// The settings store could not be read or written
    Settings { message: String },

    /// Configuration errors
    Config(ConfigError),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::AccessDenied => write!(f, "{}", ACCESS_DENIED_MESSAGE),
            ExportError::RouteNotFound { route } => write!(f, "Route '{}' not provided", route),
            ExportError::Upstream { entity, message } => {
                write!(f, "Failed to export {}: {}", entity, message)
            }
            ExportError::Settings { message } => write!(f, "Settings store error: {}", message),
            ExportError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// Error response structure for server-side failures
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ExportError {
    /// Wrap a collaborator failure for the given entity kind
    pub fn upstream(entity: &str, err: impl fmt::Display) -> Self {
        ExportError::Upstream {
            entity: entity.to_string(),
            message: err.to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExportError::AccessDenied => StatusCode::OK,
            ExportError::RouteNotFound { .. } => StatusCode::OK,
            ExportError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ExportError::Settings { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ExportError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ExportError::AccessDenied => "ACCESS_DENIED",
            ExportError::RouteNotFound { .. } => "ROUTE_NOT_FOUND",
            ExportError::Upstream { .. } => "UPSTREAM_UNAVAILABLE",
            ExportError::Settings { .. } => "SETTINGS_ERROR",
            ExportError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ExportError::AccessDenied => {
                (status, Json(json!({ "error": ACCESS_DENIED_MESSAGE }))).into_response()
            }
            ExportError::RouteNotFound { .. } => (
                status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                NOT_PROVIDED_BODY,
            )
                .into_response(),
            other => (status, Json(other.to_response())).into_response(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    Parse {
        file: Option<String>,
        message: String,
    },

    /// Configuration file could not be read
    #[error("Failed to read '{path}': {message}")]
    Io { path: String, message: String },

    /// Invalid value in configuration
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<ConfigError> for ExportError {
    fn from(err: ConfigError) -> Self {
        ExportError::Config(err)
    }
}
