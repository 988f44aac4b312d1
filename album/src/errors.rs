use crate::media::MediaError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error as ThisError;
use utoipa::ToSchema;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid or missing request data
    #[error("{message}")]
    BadRequest { message: String },

    /// Uploaded file exceeds the configured ceiling
    #[error("{message}")]
    PayloadTooLarge { message: String },

    /// The remote media service failed. `message` is what callers see; `details` is only
    /// rendered when the handler opted in to exposing the remote error text.
    #[error("{message}: {source}")]
    Upstream {
        message: String,
        details: Option<String>,
        source: MediaError,
    },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Stable, caller-safe description of what failed
    pub error: String,
    /// Remote service error text, present only on diagnostic endpoints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Upstream { .. } | Error::Internal { .. } | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest { message } | Error::PayloadTooLarge { message } | Error::Upstream { message, .. } => message.clone(),
            Error::Internal { .. } | Error::Other(_) => "Internal server error".to_string(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        let details = match self {
            Error::Upstream { details, .. } => details.clone(),
            _ => None,
        };
        ErrorBody {
            error: self.user_message(),
            details,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Upstream { .. } => {
                tracing::error!("Media service error: {:#}", self);
            }
            Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::PayloadTooLarge { .. } => {
                tracing::info!("Rejected oversized upload: {}", self);
            }
            Error::BadRequest { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        (self.status_code(), Json(self.body())).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    async fn render(error: Error) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_body() {
        let (status, body) = render(Error::BadRequest {
            message: "No file uploaded".to_string(),
        })
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "No file uploaded"}));
    }

    #[tokio::test]
    async fn test_upstream_hides_source_without_details() {
        let (status, body) = render(Error::Upstream {
            message: "Failed to upload image".to_string(),
            details: None,
            source: MediaError::Api {
                status: 401,
                message: "Invalid api_key".to_string(),
            },
        })
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to upload image"}));
    }

    #[tokio::test]
    async fn test_upstream_with_details() {
        let (_, body) = render(Error::Upstream {
            message: "Cloudinary connection failed".to_string(),
            details: Some("Invalid api_key".to_string()),
            source: MediaError::Api {
                status: 401,
                message: "Invalid api_key".to_string(),
            },
        })
        .await;

        assert_eq!(body, json!({"error": "Cloudinary connection failed", "details": "Invalid api_key"}));
    }

    #[tokio::test]
    async fn test_internal_errors_are_generic() {
        let (status, body) = render(Error::Other(anyhow::anyhow!("connection pool exploded"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Internal server error"}));
    }

    #[test]
    fn test_payload_too_large_status() {
        let error = Error::PayloadTooLarge {
            message: "too big".to_string(),
        };
        assert_eq!(error.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
