//! Typed error handling for the representation engine
//!
//! Every failure produced while validating, sorting, negotiating or shaping a
//! resource is a deterministic function of the request input. The error types
//! here let handlers map each case to the right client-visible response.
//!
//! # Error Categories
//!
//! - [`FieldError`]: requested or sort field absent from a resource type
//! - [`MappingError`]: invalid mapping table (startup-time, fatal)
//! - [`NegotiationError`]: `Accept` header could not be parsed
//! - [`ConfigError`]: configuration parsing and route resolution
//!
//! # Example
//!
//! ```rust,ignore
//! match registry.lookup("Author", "height") {
//!     Ok(entry) => println!("{:?}", entry.backing_fields),
//!     Err(ShapeError::Field(FieldError::UnknownField { field, .. })) => {
//!         println!("cannot sort by {}", field);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type of the crate
#[derive(Debug)]
pub enum ShapeError {
    /// Unknown field or resource kind (client input)
    Field(FieldError),

    /// Mapping table construction errors
    Mapping(MappingError),

    /// Content negotiation errors
    Negotiation(NegotiationError),

    /// Configuration errors
    Config(ConfigError),

    /// A resource instance does not exist
    NotFound { resource_kind: String, id: Uuid },

    /// Internal invariant violation (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::Field(e) => write!(f, "{}", e),
            ShapeError::Mapping(e) => write!(f, "{}", e),
            ShapeError::Negotiation(e) => write!(f, "{}", e),
            ShapeError::Config(e) => write!(f, "{}", e),
            ShapeError::NotFound { resource_kind, id } => {
                write!(f, "{} with id '{}' not found", resource_kind, id)
            }
            ShapeError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ShapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShapeError::Field(e) => Some(e),
            ShapeError::Mapping(e) => Some(e),
            ShapeError::Negotiation(e) => Some(e),
            ShapeError::Config(e) => Some(e),
            ShapeError::NotFound { .. } | ShapeError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ShapeError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShapeError::Field(e) => e.status_code(),
            ShapeError::Mapping(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShapeError::Negotiation(_) => StatusCode::BAD_REQUEST,
            ShapeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShapeError::NotFound { .. } => StatusCode::NOT_FOUND,
            ShapeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShapeError::Field(e) => e.error_code(),
            ShapeError::Mapping(e) => e.error_code(),
            ShapeError::Negotiation(_) => "UNSUPPORTED_MEDIA_TYPE",
            ShapeError::Config(_) => "CONFIG_ERROR",
            ShapeError::NotFound { .. } => "RESOURCE_NOT_FOUND",
            ShapeError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error was caused by client input
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShapeError::Field(FieldError::UnknownField {
                resource_kind,
                field,
            }) => Some(serde_json::json!({
                "resource_kind": resource_kind,
                "field": field
            })),
            ShapeError::Negotiation(NegotiationError::UnsupportedMediaType { value, .. }) => {
                Some(serde_json::json!({ "accept": value }))
            }
            ShapeError::NotFound { resource_kind, id } => Some(serde_json::json!({
                "resource_kind": resource_kind,
                "id": id.to_string()
            })),
            _ => None,
        }
    }
}

impl IntoResponse for ShapeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Errors raised when a field name cannot be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The field is not part of the resource type or its mapping table
    UnknownField {
        resource_kind: String,
        field: String,
    },

    /// No mapping table is registered for the resource kind
    UnknownResourceKind { resource_kind: String },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::UnknownField {
                resource_kind,
                field,
            } => write!(f, "Unknown field '{}' for {}", field, resource_kind),
            FieldError::UnknownResourceKind { resource_kind } => {
                write!(f, "No field mapping registered for {}", resource_kind)
            }
        }
    }
}

impl std::error::Error for FieldError {}

impl FieldError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            FieldError::UnknownField { .. } => "UNKNOWN_FIELD",
            FieldError::UnknownResourceKind { .. } => "UNKNOWN_RESOURCE_KIND",
        }
    }
}

impl From<FieldError> for ShapeError {
    fn from(err: FieldError) -> Self {
        ShapeError::Field(err)
    }
}

// =============================================================================
// Mapping Errors
// =============================================================================

/// Errors raised while building the mapping table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// The logical name is already registered for the resource kind
    DuplicateMapping {
        resource_kind: String,
        logical_name: String,
    },

    /// A mapping entry must name at least one backing field
    EmptyBackingFields {
        resource_kind: String,
        logical_name: String,
    },

    /// The process-wide registry was already installed
    AlreadyInstalled,
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::DuplicateMapping {
                resource_kind,
                logical_name,
            } => write!(
                f,
                "Mapping for '{}' is already registered on {}",
                logical_name, resource_kind
            ),
            MappingError::EmptyBackingFields {
                resource_kind,
                logical_name,
            } => write!(
                f,
                "Mapping for '{}' on {} has no backing fields",
                logical_name, resource_kind
            ),
            MappingError::AlreadyInstalled => {
                write!(f, "Mapping registry is already installed")
            }
        }
    }
}

impl std::error::Error for MappingError {}

impl MappingError {
    pub fn error_code(&self) -> &'static str {
        match self {
            MappingError::DuplicateMapping { .. } => "DUPLICATE_MAPPING",
            MappingError::EmptyBackingFields { .. } => "EMPTY_MAPPING",
            MappingError::AlreadyInstalled => "MAPPING_ALREADY_INSTALLED",
        }
    }
}

impl From<MappingError> for ShapeError {
    fn from(err: MappingError) -> Self {
        ShapeError::Mapping(err)
    }
}

// =============================================================================
// Negotiation Errors
// =============================================================================

/// Errors raised by content negotiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    /// The header value is not a parseable media type
    UnsupportedMediaType { value: String, reason: String },
}

impl fmt::Display for NegotiationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NegotiationError::UnsupportedMediaType { value, reason } => {
                write!(f, "Unsupported media type '{}': {}", value, reason)
            }
        }
    }
}

impl std::error::Error for NegotiationError {}

impl From<NegotiationError> for ShapeError {
    fn from(err: NegotiationError) -> Self {
        ShapeError::Negotiation(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// A link template names a route that is not declared
    MissingRoute { route: String },

    /// A route template references a parameter that was not supplied
    MissingRouteParameter { route: String, parameter: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::MissingRoute { route } => {
                write!(f, "Route '{}' is not declared", route)
            }
            ConfigError::MissingRouteParameter { route, parameter } => {
                write!(
                    f,
                    "Route '{}' requires parameter '{}'",
                    route, parameter
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ShapeError {
    fn from(err: ConfigError) -> Self {
        ShapeError::Config(err)
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for representation operations
pub type ShapeResult<T> = Result<T, ShapeError>;

// =============================================================================
// Tests
// =============================================================================
