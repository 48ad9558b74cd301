use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Errors raised while talking to the REST backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Backend rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: Value },
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl ApiError {
    /// The backend's error payload, when it sent one.
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Errors from the token endpoints.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("Error de autenticación: {0}")]
    Authentication(String),
    #[error("Not logged in")]
    MissingToken,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors raised by a field's change handler.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Fecha inválida: {0}")]
    InvalidDate(String),
    #[error("Opción inválida: {0}")]
    UnknownOption(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid base URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}
