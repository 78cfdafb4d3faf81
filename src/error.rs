use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Model artifact read/write errors, with the offending path
    #[error("Model artifact error at {}: {}", .path.display(), .message)]
    Artifact { path: PathBuf, message: String },

    /// No underlying classifier where one is required
    #[error("Model {model} not initialized: no underlying classifier")]
    ModelNotInitialized { model: &'static str },

    /// Prediction requested before any successful train/load
    #[error("Model {model} not trained")]
    ModelNotTrained { model: &'static str },

    /// Factory given an unregistered model key
    #[error("Unknown model type: {requested}. Available: {known:?}")]
    UnknownModelType {
        requested: String,
        known: &'static [&'static str],
    },

    /// Backend failure while fitting a classifier
    #[error("Failed to train {model}: {message}")]
    Training { model: &'static str, message: String },

    /// Backend failure while predicting
    #[error("Prediction failed for {model}: {message}")]
    Prediction { model: &'static str, message: String },

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownModelType { .. } => StatusCode::BAD_REQUEST,
            AppError::ModelNotTrained { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Artifact { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ModelNotInitialized { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Training { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Prediction { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Artifact { .. } => "ARTIFACT_ERROR",
            AppError::ModelNotInitialized { .. } => "MODEL_NOT_INITIALIZED",
            AppError::ModelNotTrained { .. } => "MODEL_NOT_TRAINED",
            AppError::UnknownModelType { .. } => "UNKNOWN_MODEL_TYPE",
            AppError::Training { .. } => "TRAINING_ERROR",
            AppError::Prediction { .. } => "PREDICTION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        tracing::error!(
            error_code = error_code,
            status_code = status.as_u16(),
            message = %message,
            "Request error"
        );

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Conversion from validator::ValidationErrors
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
