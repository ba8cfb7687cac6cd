// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error taxonomy shared by the service layer and the HTTP boundary.
//!
//! Services return [`ServiceError`], which is always exactly one of the
//! validation / auth / conflict / not-found / internal kinds. Handlers turn it
//! into an [`ApiError`], the only error type that is ever rendered.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthError;
use crate::storage::DbError;

/// Caller input is missing or malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Full Name is required")]
    MissingFullName,
    #[error("Email is required")]
    MissingEmail,
    #[error("Password is required")]
    MissingPassword,
    #[error("Title is required")]
    MissingTitle,
    #[error("Content is required")]
    MissingContent,
    #[error("No changes provided")]
    NoChanges,
    #[error("Search query is required")]
    EmptyQuery,
}

/// A uniqueness constraint would be violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("User already exists")]
    DuplicateEmail,
}

/// The resource does not exist or is not owned by the caller.
///
/// The two cases are deliberately the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{resource} not found")]
pub struct NotFoundError {
    pub resource: &'static str,
}

impl NotFoundError {
    pub const fn note() -> Self {
        Self { resource: "Note" }
    }

    pub const fn user() -> Self {
        Self { resource: "User" }
    }
}

/// Result of every public service operation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Unexpected collaborator failure. The detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self::Internal(detail.to_string())
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        Self::internal(format!("store failure: {e}"))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// HTTP Error
// =============================================================================

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Machine-readable code, set for authentication failures.
    pub code: Option<&'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(v) => ApiError::bad_request(v.to_string()),
            ServiceError::Auth(a) => ApiError::from(a),
            // Duplicate registration is reported in-band with the error flag set.
            ServiceError::Conflict(c) => ApiError::new(StatusCode::OK, c.to_string()),
            ServiceError::NotFound(n) => ApiError::not_found(n.to_string()),
            ServiceError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                ApiError::internal()
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        if let AuthError::Signing(detail) = &e {
            tracing::error!(error = %detail, "token signing failed");
            return ApiError::internal();
        }
        ApiError::new(e.status_code(), e.to_string()).with_code(e.error_code())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: true,
            message: self.message,
            error_code: self.code,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.message, "bad");

        let unauthorized = ApiError::unauthorized("who");
        assert_eq!(unauthorized.status, StatusCode::UNAUTHORIZED);

        let internal = ApiError::internal();
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.message, "Internal Server Error");
    }

    #[tokio::test]
    async fn into_response_returns_json_envelope() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":true,"message":"bad data"}"#);
    }

    #[test]
    fn service_errors_map_to_statuses() {
        let validation: ApiError = ServiceError::from(ValidationError::MissingTitle).into();
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert_eq!(validation.message, "Title is required");

        let conflict: ApiError = ServiceError::from(ConflictError::DuplicateEmail).into();
        assert_eq!(conflict.status, StatusCode::OK);
        assert_eq!(conflict.message, "User already exists");

        let not_found: ApiError = ServiceError::from(NotFoundError::note()).into();
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.message, "Note not found");

        let auth: ApiError = ServiceError::from(AuthError::Expired).into();
        assert_eq!(auth.status, StatusCode::UNAUTHORIZED);
        assert_eq!(auth.code, Some("token_expired"));

        let login: ApiError = ServiceError::from(AuthError::InvalidCredentials).into();
        assert_eq!(login.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_hide_detail() {
        let api: ApiError = ServiceError::internal("disk on fire at /var/lib").into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.message.contains("disk"));

        let signing: ApiError = AuthError::Signing("bad key".into()).into();
        assert_eq!(signing.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!signing.message.contains("bad key"));
    }
}
