//! Per-account lockout state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The lockout state tracked for one normalized username.
///
/// Records are created lazily on the first attempt event for a username and
/// persist until explicitly reset or cleared; they never expire on their own.
/// The [`LockoutStore`](crate::store::LockoutStore) exclusively owns the
/// mutable state; everything handed to callers is a cloned snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    /// The store's key: lowercase, trimmed.
    pub username: String,
    /// Consecutive non-successful attempts since the last reset or unlock.
    pub failed_attempts: u32,
    /// When the most recent failed attempt was recorded.
    pub last_failed_at: DateTime<Utc>,
    /// Whether the account is currently locked.
    pub locked: bool,
    /// When the active lock started. Set if and only if `locked` is true.
    pub lockout_started_at: Option<DateTime<Utc>>,
}

impl AccountRecord {
    /// A brand-new record: creation itself counts as the first attempt.
    pub(crate) fn first_attempt(username: &str, now: DateTime<Utc>) -> Self {
        Self {
            username: username.to_string(),
            failed_attempts: 1,
            last_failed_at: now,
            locked: false,
            lockout_started_at: None,
        }
    }

    /// Check the `locked ⇔ lockout_started_at` pairing. A violation is a
    /// defect in the transition rules, not a runtime condition.
    pub(crate) fn debug_check(&self) {
        debug_assert_eq!(
            self.locked,
            self.lockout_started_at.is_some(),
            "record for {:?} violates the lock/timestamp pairing",
            self.username
        );
    }
}

/// Normalize a raw username into the store's key form.
///
/// Applied before any lookup, so `"Alice "` and `"alice"` collide to the
/// same record. An all-whitespace input normalizes to the empty string,
/// which callers must reject before touching the store.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}
