use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::types::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("invalid username or password")]
    Rejected { attempt: u32, threshold: u32 },

    #[error("account locked for {remaining_secs} more seconds")]
    Locked { remaining_secs: i64 },

    #[error("no account information found for user: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<lockdown_core::Error> for ApiError {
    fn from(err: lockdown_core::Error) -> Self {
        match err {
            lockdown_core::Error::AccountNotFound { username } => ApiError::NotFound(username),
            lockdown_core::Error::InvalidUsername => {
                ApiError::BadRequest("Username is null or empty".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => {
                let status = StatusCode::BAD_REQUEST;
                (status, ApiResponse::new(message, status))
            }
            ApiError::Rejected { attempt, threshold } => {
                let status = StatusCode::UNAUTHORIZED;
                (
                    status,
                    ApiResponse::new("Invalid username or password", status).with_developer_message(
                        format!("Failed login attempt {attempt} of {threshold}"),
                    ),
                )
            }
            ApiError::Locked { remaining_secs } => {
                let status = StatusCode::TOO_MANY_REQUESTS;
                (
                    status,
                    ApiResponse::new(
                        format!(
                            "Your account is locked. Please try again in {remaining_secs} seconds"
                        ),
                        status,
                    )
                    .with_developer_message(format!(
                        "Account locked. Remaining lockout seconds: {remaining_secs}"
                    )),
                )
            }
            ApiError::NotFound(username) => {
                let status = StatusCode::NOT_FOUND;
                (
                    status,
                    ApiResponse::new(
                        format!("No account information found for user: {username}"),
                        status,
                    ),
                )
            }
            ApiError::Internal(detail) => {
                // Full context stays server-side; the caller gets a generic body.
                tracing::error!(error = %detail, "internal error while handling request");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (
                    status,
                    ApiResponse::new("An error occurred while processing your request", status),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
