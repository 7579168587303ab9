//! RPC error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use civis_service::ServiceError;
use civis_verification::ErrorClass;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("internal server error")]
    Internal(String),

    #[error("server error: {0}")]
    Server(String),
}

impl From<ServiceError> for RpcError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Verification(v) => match v.class() {
                ErrorClass::NotFound => RpcError::NotFound(v.to_string()),
                ErrorClass::Forbidden => RpcError::Forbidden(v.to_string()),
                ErrorClass::InvalidState => RpcError::Conflict(v.to_string()),
                ErrorClass::InvalidArgument => RpcError::BadRequest(v.to_string()),
            },
            ServiceError::AdminRequired => RpcError::Forbidden(e.to_string()),
            ServiceError::MalformedSmsBody => RpcError::BadRequest(e.to_string()),
            ServiceError::Integrity(_) | ServiceError::Store(_) => {
                RpcError::Internal(e.to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = match &self {
            RpcError::Unauthenticated => StatusCode::UNAUTHORIZED,
            RpcError::NotFound(_) => StatusCode::NOT_FOUND,
            RpcError::Forbidden(_) => StatusCode::FORBIDDEN,
            RpcError::Conflict(_) => StatusCode::CONFLICT,
            RpcError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::Internal(_) | RpcError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let RpcError::Internal(detail) | RpcError::Server(detail) = &self {
            error!(%detail, "request failed with internal error");
        }
        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
