//! Typed error handling for roster
//!
//! Errors are grouped by category so that handlers and clients can match on
//! what went wrong instead of inspecting strings. Every category knows its
//! HTTP status and a stable machine readable code.
//!
//! # Error Categories
//!
//! - [`EntityError`]: missing companies or employees
//! - [`ValidationError`]: rejected input (age range, DTO fields, JSON, patches)
//! - [`RequestError`]: malformed requests (headers, ids)
//! - [`StorageError`]: failures inside the storage collaborator
//! - [`ConfigError`]: configuration parsing and loading
//!
//! Unresolvable sort or field tokens are deliberately absent: they are
//! dropped during parsing and never surface as errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use roster::prelude::*;
//!
//! async fn find(repo: &dyn CompanyRepository, id: Uuid) -> ApiResult<CompanyDto> {
//!     let company = repo
//!         .get_company(&id)
//!         .await?
//!         .ok_or_else(|| EntityError::not_found("Company", id))?;
//!     Ok(CompanyDto::from(&company))
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

/// The main error type returned by handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity-related errors
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Input validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Storage collaborator errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
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

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Entity(e) => e.status_code(),
            ApiError::Validation(e) => e.status_code(),
            ApiError::Request(e) => e.status_code(),
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Entity(e) => e.error_code(),
            ApiError::Validation(e) => e.error_code(),
            ApiError::Request(e) => e.error_code(),
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::Config(_) => "CONFIG_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            ApiError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to stored records
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    /// Record was not found
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: Uuid },

    /// Some ids of a requested collection do not exist
    #[error("Some {entity_type} ids are not valid in the collection ({found} of {requested} found)")]
    MissingIds {
        entity_type: String,
        requested: usize,
        found: usize,
    },
}

impl EntityError {
    pub fn not_found(entity_type: &str, id: Uuid) -> Self {
        EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::MissingIds { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::MissingIds { .. } => "ENTITY_IDS_NOT_FOUND",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A filter range whose bounds are inverted or empty
    #[error("{message}")]
    InvalidRange { message: String },

    /// Field-level errors reported by DTO validation
    #[error("Validation errors: {}", format_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// Body could not be parsed
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    /// A patch document could not be applied
    #[error("Invalid patch document: {message}")]
    InvalidPatch { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::InvalidRange { .. } => StatusCode::BAD_REQUEST,
            ValidationError::FieldErrors(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ValidationError::InvalidJson { .. } => StatusCode::BAD_REQUEST,
            ValidationError::InvalidPatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidRange { .. } => "INVALID_RANGE",
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
            ValidationError::InvalidPatch { .. } => "INVALID_PATCH",
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_errors("", &errors, &mut fields);
        // ValidationErrors is backed by a HashMap
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

fn collect_field_errors(
    prefix: &str,
    errors: &validator::ValidationErrors,
    out: &mut Vec<FieldValidationError>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| FieldValidationError {
                    field: path.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_errors(&format!("{path}[{index}]"), nested, out);
                }
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.into())
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Missing required header
    #[error("{header} header is missing.")]
    MissingHeader { header: String },

    /// Accept header present but not a media type
    #[error("Media type not present. Please add Accept header with required media type.")]
    InvalidMediaType { value: String },

    /// Invalid entity ID format
    #[error("Invalid entity ID format: '{id}'")]
    InvalidEntityId { id: String },

    /// Query string that cannot be read into the endpoint's parameters
    #[error("Invalid query string: {message}")]
    InvalidQuery { message: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::MissingHeader { .. } => "MISSING_HEADER",
            RequestError::InvalidMediaType { .. } => "INVALID_MEDIA_TYPE",
            RequestError::InvalidEntityId { .. } => "INVALID_ENTITY_ID",
            RequestError::InvalidQuery { .. } => "INVALID_QUERY",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by the storage collaborator
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A lock guarding the store was poisoned by a panicking writer
    #[error("Storage lock '{resource}' is poisoned")]
    LockPoisoned { resource: String },

    /// Query execution error
    #[error("Query error: {message}")]
    QueryError { message: String },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{f}'")).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

/// Convert from anyhow::Error returned by repositories
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<ApiError>() {
            Ok(api) => return api,
            Err(err) => err,
        };
        match err.downcast::<StorageError>() {
            Ok(storage) => ApiError::Storage(storage),
            Err(err) => ApiError::Internal(err.to_string()),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Tests
// =============================================================================
