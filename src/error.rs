use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::policy::Deny;

/// Structured error body returned by every endpoint on failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// An external collaborator (storage, mail, completion) failed. The
    /// upstream message is passed through verbatim, no retry.
    #[error("upstream service failed: {0}")]
    Upstream(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found", what))
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            ApiError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message,
                },
            ),
            ApiError::Unauthenticated(message) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "UNAUTHENTICATED",
                    message,
                },
            ),
            ApiError::Forbidden(message) => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "FORBIDDEN",
                    message,
                },
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message,
                },
            ),
            ApiError::Conflict(message) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONFLICT",
                    message,
                },
            ),
            ApiError::Upstream(message) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    code: "UPSTREAM_ERROR",
                    message,
                },
            ),
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                ApiError::Conflict("Duplicate value for a unique field".into())
            }
            _ => ApiError::Internal(e.into()),
        }
    }
}

impl From<Deny> for ApiError {
    fn from(deny: Deny) -> Self {
        match deny {
            Deny::Unauthenticated => {
                ApiError::Unauthenticated("Authentication required".into())
            }
            Deny::Forbidden => ApiError::Forbidden("Insufficient permissions".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_distinct_for_authn_and_authz() {
        let unauthn = ApiError::Unauthenticated("no token".into()).into_response();
        let unauthz = ApiError::Forbidden("not yours".into()).into_response();
        assert_eq!(unauthn.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unauthz.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn deny_maps_to_expected_statuses() {
        assert_eq!(
            ApiError::from(Deny::Unauthenticated).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(Deny::Forbidden).into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn upstream_maps_to_502_and_keeps_message() {
        let err = ApiError::Upstream("mail provider returned 500".into());
        assert!(err.to_string().contains("mail provider returned 500"));
    }
}
