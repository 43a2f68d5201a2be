use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tokio_postgres::error::SqlState;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Status code this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_code, message) = match self {
            ApiError::Database(ref err) => {
                if err.contains("connection") {
                    tracing::error!("PostgreSQL connection issue: {}", err);
                } else if err.contains("timeout") {
                    tracing::warn!("PostgreSQL operation timeout: {}", err);
                } else {
                    tracing::error!("PostgreSQL database error: {}", err);
                }

                let user_message = if err.contains("timeout") {
                    "Database operation timed out, please try again"
                } else if err.contains("unavailable") || err.contains("connection") {
                    "Database service is temporarily unavailable"
                } else {
                    "A database error occurred"
                };

                ("DATABASE_ERROR", user_message.to_string())
            }
            ApiError::Validation(ref message) => {
                tracing::debug!("Validation error: {}", message);
                ("VALIDATION_ERROR", message.clone())
            }
            ApiError::Unauthorized => ("UNAUTHORIZED", "Unauthorized".to_string()),
            ApiError::InvalidCredentials => ("INVALID_CREDENTIALS", "Invalid credentials".to_string()),
            ApiError::NotFound(ref resource) => {
                tracing::debug!("Resource not found: {}", resource);
                ("NOT_FOUND", format!("{} not found", resource))
            }
            ApiError::Conflict(ref message) => {
                tracing::debug!("Constraint conflict: {}", message);
                ("CONFLICT", message.clone())
            }
            ApiError::Internal(ref err) => {
                tracing::error!("Internal server error: {:#}", err);
                ("INTERNAL_ERROR", "An internal server error occurred".to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

// PostgreSQL error mapping
impl From<tokio_postgres::Error> for ApiError {
    fn from(err: tokio_postgres::Error) -> Self {
        match err.code() {
            Some(&SqlState::UNIQUE_VIOLATION) => {
                // users.email and users.username are the only unique columns besides primary keys
                let message = if err.to_string().contains("users") {
                    "User already exists".to_string()
                } else {
                    "Resource already exists".to_string()
                };
                ApiError::Conflict(message)
            }
            Some(&SqlState::FOREIGN_KEY_VIOLATION) => {
                ApiError::Validation("Referenced resource does not exist".to_string())
            }
            Some(&SqlState::NOT_NULL_VIOLATION) => {
                ApiError::Validation("All fields are required".to_string())
            }
            Some(&SqlState::CHECK_VIOLATION) => {
                ApiError::Validation("Data validation constraint violated".to_string())
            }
            Some(&SqlState::INVALID_TEXT_REPRESENTATION) => {
                ApiError::Validation("Invalid data format provided".to_string())
            }
            Some(&SqlState::STRING_DATA_RIGHT_TRUNCATION) => {
                ApiError::Validation("Text data exceeds maximum length".to_string())
            }
            Some(&SqlState::CONNECTION_EXCEPTION)
            | Some(&SqlState::CONNECTION_DOES_NOT_EXIST)
            | Some(&SqlState::CONNECTION_FAILURE) => {
                tracing::error!("PostgreSQL connection error: {}", err);
                ApiError::Database("Database connection unavailable".to_string())
            }
            _ => {
                tracing::error!("Unhandled PostgreSQL error: {} (code: {:?})", err, err.code());
                ApiError::Database("Database operation failed".to_string())
            }
        }
    }
}

// Connection pool error mapping
impl From<deadpool_postgres::PoolError> for ApiError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        match err {
            deadpool_postgres::PoolError::Timeout(_) => {
                tracing::warn!("Database connection pool timeout: {}", err);
                ApiError::Database("Database connection timeout".to_string())
            }
            deadpool_postgres::PoolError::Closed => {
                tracing::error!("Database connection pool is closed: {}", err);
                ApiError::Database("Database service unavailable".to_string())
            }
            deadpool_postgres::PoolError::NoRuntimeSpecified => {
                tracing::error!("Database pool runtime error: {}", err);
                ApiError::Internal(anyhow::anyhow!("Database configuration error"))
            }
            _ => {
                tracing::error!("Database connection pool error: {}", err);
                ApiError::Database("Database connection unavailable".to_string())
            }
        }
    }
}

// Result type alias for convenience
pub type ApiResult<T> = Result<T, ApiError>;
