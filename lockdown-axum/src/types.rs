use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use lockdown_core::LockoutStats;
use serde::{Deserialize, Serialize};

/// Input claims posted by the identity orchestrator on every sign-in attempt.
///
/// A non-empty `objectId` means the orchestrator already verified the
/// credentials: the attempt is a success signal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub sign_in_name: Option<String>,
    #[serde(default)]
    pub object_id: Option<String>,
}

impl SignInRequest {
    pub fn is_success_signal(&self) -> bool {
        self.object_id.as_deref().is_some_and(|v| !v.is_empty())
    }
}

/// Wire envelope for decision and administrative responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_message: Option<String>,
}

impl ApiResponse {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            status_code: status.as_u16(),
            developer_message: None,
        }
    }

    pub fn with_developer_message(mut self, message: impl Into<String>) -> Self {
        self.developer_message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate counts plus the policy in effect, for the monitoring surface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub counts: LockoutStats,
    pub lockout_threshold: u32,
    pub unlock_window_minutes: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearAllResponse {
    pub message: String,
    pub removed: usize,
}
