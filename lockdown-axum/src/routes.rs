use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use lockdown_core::{AccountAdmin, Decision, LockoutService};

use crate::{
    error::{ApiError, Result},
    types::{ApiResponse, ClearAllResponse, HealthResponse, SignInRequest, StatsResponse},
};

/// Shared state for all handlers: the attempt-processing surface and the
/// administrative surface, both built over the same store.
#[derive(Clone)]
pub struct AppState {
    pub lockout: Arc<LockoutService>,
    pub admin: Arc<AccountAdmin>,
}

pub fn create_router(lockout: Arc<LockoutService>, admin: Arc<AccountAdmin>) -> Router {
    let state = AppState { lockout, admin };

    Router::new()
        .route("/signin", post(sign_in_handler))
        .route("/status/{username}", get(status_handler))
        .route("/reset/{username}", post(reset_handler))
        .route("/unlock/{username}", post(unlock_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/accounts", get(accounts_handler))
        .route("/clear-all", post(clear_all_handler))
        .with_state(state)
}

/// The decision callback invoked on every sign-in attempt.
///
/// The body is read raw so that an empty or malformed payload maps to a 400
/// before any account state is touched.
async fn sign_in_handler(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("Request content is empty".to_string()));
    }

    let claims: SignInRequest = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Cannot deserialize input claims".to_string()))?;

    let username = claims.sign_in_name.as_deref().unwrap_or_default();
    let decision = state
        .lockout
        .process_attempt(username, claims.is_success_signal())?;

    match decision {
        Decision::Allowed => Ok(Json(ApiResponse::new("Successful sign-in", StatusCode::OK))),
        Decision::Rejected { attempt, threshold } => {
            Err(ApiError::Rejected { attempt, threshold })
        }
        Decision::Locked { .. } => Err(ApiError::Locked {
            remaining_secs: decision.remaining_secs(),
        }),
    }
}

async fn status_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    let status = state.admin.status(&username)?;
    Ok(Json(status))
}

async fn reset_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    state.admin.reset(&username)?;
    Ok(Json(ApiResponse::new(
        format!("Account reset successfully for user: {username}"),
        StatusCode::OK,
    )))
}

async fn unlock_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    state.admin.unlock(&username)?;
    Ok(Json(ApiResponse::new(
        format!("Account unlocked successfully for user: {username}"),
        StatusCode::OK,
    )))
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let policy = state.admin.policy().clone();
    Json(StatsResponse {
        counts: state.admin.statistics(),
        lockout_threshold: policy.threshold,
        unlock_window_minutes: policy.unlock_window_minutes(),
        timestamp: Utc::now(),
    })
}

async fn accounts_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.admin.list_accounts())
}

async fn clear_all_handler(State(state): State<AppState>) -> impl IntoResponse {
    let removed = state.admin.clear_all();
    Json(ClearAllResponse {
        message: format!("All accounts cleared successfully. {removed} accounts removed."),
        removed,
    })
}
