//! Lockout policy configuration.

use chrono::Duration;

/// Failed attempts after which an account is locked.
pub const DEFAULT_LOCKOUT_THRESHOLD: u32 = 5;

/// Minutes a lock remains in effect before the next attempt can unlock it.
pub const DEFAULT_UNLOCK_WINDOW_MINUTES: i64 = 1;

/// Policy applied to every account.
///
/// Read once at startup and held immutable for the lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct LockoutPolicy {
    /// Consecutive failed attempts that trigger a lock. Always `>= 1`.
    pub threshold: u32,
    /// Duration a lock remains in effect before the account is eligible to
    /// be unlocked on its next attempt. Never negative.
    pub unlock_window: Duration,
}

impl LockoutPolicy {
    /// Build a policy, clamping out-of-range values into the valid domain.
    pub fn new(threshold: u32, unlock_window: Duration) -> Self {
        Self {
            threshold: threshold.max(1),
            unlock_window: unlock_window.max(Duration::zero()),
        }
    }

    /// The unlock window in whole minutes, for reporting surfaces.
    pub fn unlock_window_minutes(&self) -> i64 {
        self.unlock_window.num_minutes()
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LOCKOUT_THRESHOLD,
            unlock_window: Duration::minutes(DEFAULT_UNLOCK_WINDOW_MINUTES),
        }
    }
}
