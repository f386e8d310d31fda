//! Pure lockout transition rules.
//!
//! [`apply_attempt`] maps `(current record, attempt, now)` to
//! `(next record, decision)`. It performs no I/O and never fails for
//! well-formed input; it is invoked inside
//! [`LockoutStore::transact`](crate::store::LockoutStore::transact) so the
//! transition and the commit form a single atomic unit.

use chrono::{DateTime, Duration, Utc};

use crate::{config::LockoutPolicy, record::AccountRecord};

/// A single sign-in evaluation for a username.
///
/// The caller has already determined whether the credentials were correct;
/// the engine only tracks attempt history and enforces the cool-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub success: bool,
}

/// Outcome of applying an attempt to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Successful sign-in; counters were reset.
    Allowed,
    /// Failed attempt below the threshold.
    Rejected { attempt: u32, threshold: u32 },
    /// The account is locked for the given remaining duration.
    Locked { remaining: Duration },
}

impl Decision {
    /// Remaining lockout time in whole seconds, clamped at zero.
    /// Zero unless the decision is [`Decision::Locked`].
    pub fn remaining_secs(&self) -> i64 {
        match self {
            Decision::Locked { remaining } => remaining.num_seconds().max(0),
            _ => 0,
        }
    }
}

/// Apply one attempt event to the current record, producing the record to
/// commit and the decision for the caller.
///
/// Transition order, preserved from the service's observable behavior:
///
/// 1. An active lock blocks every attempt, even a flagged-successful one,
///    until `unlock_window` has elapsed since the lock started.
/// 2. Once the window has elapsed, the unlocking attempt itself counts as
///    one fresh attempt before its success flag is evaluated. A brand-new
///    record likewise starts at one attempt; an existing unlocked record
///    increments by one.
/// 3. A successful attempt then resets the counter and clears any lock.
/// 4. A failed attempt locks the account once the counter reaches the
///    threshold, otherwise it is rejected with the running count.
pub fn apply_attempt(
    policy: &LockoutPolicy,
    username: &str,
    current: Option<&AccountRecord>,
    attempt: Attempt,
    now: DateTime<Utc>,
) -> (AccountRecord, Decision) {
    let mut record = match current {
        Some(existing) => {
            existing.debug_check();
            let mut record = existing.clone();
            match record.lockout_started_at.filter(|_| record.locked) {
                Some(started) => {
                    let elapsed = now - started;
                    if elapsed < policy.unlock_window {
                        // Still locked: no mutation, success flag ignored.
                        let remaining = (policy.unlock_window - elapsed).max(Duration::zero());
                        return (record, Decision::Locked { remaining });
                    }
                    // Window elapsed: unlock, counting this event as one
                    // fresh attempt before evaluating its success flag.
                    record.locked = false;
                    record.lockout_started_at = None;
                    record.failed_attempts = 1;
                    record.last_failed_at = now;
                    record
                }
                None => {
                    record.failed_attempts += 1;
                    record.last_failed_at = now;
                    record
                }
            }
        }
        None => AccountRecord::first_attempt(username, now),
    };

    if attempt.success {
        record.failed_attempts = 0;
        record.locked = false;
        record.lockout_started_at = None;
        return (record, Decision::Allowed);
    }

    if record.failed_attempts >= policy.threshold {
        record.locked = true;
        record.lockout_started_at = Some(now);
        let remaining = policy.unlock_window;
        (record, Decision::Locked { remaining })
    } else {
        let attempt_no = record.failed_attempts;
        let threshold = policy.threshold;
        (
            record,
            Decision::Rejected {
                attempt: attempt_no,
                threshold,
            },
        )
    }
}
