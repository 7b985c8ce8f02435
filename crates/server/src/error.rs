use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use receipt::ReceiptError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Sale {0} not found")]
    SaleNotFound(receipt::SaleId),

    #[error("Receipt generation failed: {0}")]
    GenerationFailed(String),

    #[error("Service overloaded, please try again later")]
    ServiceOverloaded,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ReceiptError> for ServiceError {
    fn from(err: ReceiptError) -> Self {
        match err {
            ReceiptError::NotFound(id) => Self::SaleNotFound(id),
            ReceiptError::Renderer(e) => Self::GenerationFailed(e.to_string()),
            ReceiptError::Database(e) => Self::Database(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::SaleNotFound(_) => (StatusCode::NOT_FOUND, "SaleNotFound", self.to_string()),
            Self::GenerationFailed(_) => {
                tracing::error!("Receipt rendering failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GenerationFailed",
                    self.to_string(),
                )
            }
            Self::ServiceOverloaded => (
                StatusCode::SERVICE_UNAVAILABLE,
                "ServiceOverloaded",
                self.to_string(),
            ),
            Self::Database(_) | Self::Internal(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
