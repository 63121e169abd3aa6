use crate::config::ConfigError;
use crate::store::RepositoryError;
use crate::telemetry::TelemetryError;
use crate::workflows::applications::Stage;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Failures of the process shell: configuration, telemetry, sockets and seeding.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Talent(TalentError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Talent(err) => write!(f, "workflow error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Talent(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<TalentError> for AppError {
    fn from(value: TalentError) -> Self {
        Self::Talent(value)
    }
}

/// Typed failure returned by every core operation.
#[derive(Debug, thiserror::Error)]
pub enum TalentError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("locked: {0}")]
    Locked(String),
    #[error("invalid stage transition from {from} to {to}")]
    InvalidTransition { from: Stage, to: Stage },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Injected by the request simulator; safe to retry.
    #[error("randomized server error")]
    TransientServer,
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

impl TalentError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code used in HTTP payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            TalentError::Validation(_) => "validation",
            TalentError::Conflict(_) => "conflict",
            TalentError::Locked(_) => "locked",
            TalentError::InvalidTransition { .. } => "invalid_transition",
            TalentError::NotFound { .. } => "not_found",
            TalentError::Forbidden(_) => "forbidden",
            TalentError::TransientServer => "transient",
            TalentError::Store(_) => "store",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            TalentError::Validation(_)
            | TalentError::Conflict(_)
            | TalentError::Locked(_)
            | TalentError::InvalidTransition { .. }
            | TalentError::Store(RepositoryError::Conflict) => StatusCode::BAD_REQUEST,
            TalentError::NotFound { .. } | TalentError::Store(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            TalentError::Forbidden(_) => StatusCode::FORBIDDEN,
            TalentError::TransientServer | TalentError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, TalentError::TransientServer)
    }
}

impl IntoResponse for TalentError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string(), "kind": self.kind() }));
        (status, body).into_response()
    }
}
