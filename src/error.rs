/*
 * Responsibility
 * - HTTP 層の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - TokenError を HTTP の意味に変換 (検証失敗はすべて 401)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::TokenError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("request timed out")]
    Timeout,

    #[error("internal server error")]
    Internal,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Timeout => (StatusCode::REQUEST_TIMEOUT, "REQUEST_TIMEOUT"),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::BadSignature
            | TokenError::Expired
            | TokenError::UnsupportedFormat
            | TokenError::Malformed
            | TokenError::InvalidClaim(_)
            | TokenError::InvalidHeader
            // Unknown user on login/refresh: reject, don't reveal which part failed.
            | TokenError::UserNotFound => AppError::Unauthorized,
            TokenError::UserLookup(_)
            | TokenError::Signing(_)
            | TokenError::ExpiryOutOfRange { .. } => AppError::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_failures_are_unauthorized() {
        for e in [
            TokenError::BadSignature,
            TokenError::Expired,
            TokenError::UnsupportedFormat,
            TokenError::Malformed,
            TokenError::InvalidClaim("userSeq"),
            TokenError::InvalidHeader,
            TokenError::UserNotFound,
        ] {
            assert!(matches!(AppError::from(e), AppError::Unauthorized));
        }
    }

    #[test]
    fn expiry_overflow_is_internal() {
        let e = TokenError::ExpiryOutOfRange {
            ttl_seconds: u64::MAX,
        };
        assert!(matches!(AppError::from(e), AppError::Internal));
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InvalidRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
