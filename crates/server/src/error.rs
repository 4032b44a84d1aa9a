//! API-boundary error taxonomy.
//!
//! Every handler failure is mapped into [`ApiError`] before it leaves the
//! service, so callers only ever see one of five statuses and a safe message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input (400).
    #[error("{0}")]
    Validation(String),
    /// Duplicate unique key (409).
    #[error("{0}")]
    Conflict(String),
    /// Bad credentials, bad/expired/reused token, missing auth header (401).
    #[error("{0}")]
    Unauthorized(String),
    /// No matching record (404).
    #[error("{0}")]
    NotFound(String),
    /// Unexpected persistence or cryptographic failure (500). Details stay in
    /// the server log; the caller gets a generic message.
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorized".to_string())
    }
}

/// JSON body returned for every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<crate::auth::tokens::TokenError> for ApiError {
    fn from(err: crate::auth::tokens::TokenError) -> Self {
        use crate::auth::tokens::TokenError;
        match err {
            TokenError::Invalid => ApiError::Unauthorized("Invalid or expired token".to_string()),
            TokenError::Signing => ApiError::Internal,
        }
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        tracing::error!("database error: {err}");
        ApiError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_codes() {
        let error = ApiError::Validation("missing field".into());
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);

        let error = ApiError::Conflict("already exists".into());
        assert_eq!(error.into_response().status(), StatusCode::CONFLICT);

        let error = ApiError::unauthorized();
        assert_eq!(error.into_response().status(), StatusCode::UNAUTHORIZED);

        let error = ApiError::NotFound("no such record".into());
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);

        let error = ApiError::Internal;
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn db_errors_surface_as_generic_internal() {
        let err: ApiError = sea_orm::DbErr::Custom("password_hash leaked?".into()).into();
        assert_eq!(err.to_string(), "Internal server error");
    }
}
