//! Attempt processing and administrative surfaces.
//!
//! Two thin services sit on top of the [`LockoutStore`]: [`LockoutService`]
//! turns sign-in attempt events into decisions, and [`AccountAdmin`] exposes
//! the read/mutate operations a monitoring surface needs. Both are handed the
//! same shared store, policy, and clock at construction time, and both mutate
//! records exclusively through the store's atomic per-key primitives.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    clock::Clock,
    config::LockoutPolicy,
    engine::{self, Attempt, Decision},
    error::Error,
    record::{AccountRecord, normalize_username},
    store::LockoutStore,
};

/// Window used by [`AccountAdmin::statistics`] to count recent failures.
const RECENT_FAILURE_WINDOW_MINUTES: i64 = 5;

/// The decision callback invoked on every sign-in attempt.
#[derive(Clone)]
pub struct LockoutService {
    store: Arc<LockoutStore>,
    policy: LockoutPolicy,
    clock: Arc<dyn Clock>,
}

impl LockoutService {
    pub fn new(store: Arc<LockoutStore>, policy: LockoutPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    /// Record one attempt event for a username and return the decision.
    ///
    /// The username is normalized before lookup; an empty result fails with
    /// [`Error::InvalidUsername`] before the store is touched. The engine
    /// transition runs inside [`LockoutStore::transact`], so the committed
    /// record and the returned decision are always consistent with each
    /// other, even under concurrent attempts for the same username.
    pub fn process_attempt(&self, username: &str, success: bool) -> Result<Decision, Error> {
        let username = normalize_username(username);
        if username.is_empty() {
            return Err(Error::InvalidUsername);
        }

        let now = self.clock.now();
        let attempt = Attempt { success };
        let (record, decision) = self.store.transact(&username, |current| {
            engine::apply_attempt(&self.policy, &username, current, attempt, now)
        });

        match &decision {
            Decision::Allowed => {
                info!(username = %record.username, "successful sign-in, counters reset");
            }
            Decision::Rejected { attempt, threshold } => {
                info!(
                    username = %record.username,
                    attempt = attempt,
                    threshold = threshold,
                    "failed sign-in attempt"
                );
            }
            Decision::Locked { .. } => {
                warn!(
                    username = %record.username,
                    failed_attempts = record.failed_attempts,
                    remaining_secs = decision.remaining_secs(),
                    "sign-in blocked by account lock"
                );
            }
        }

        Ok(decision)
    }
}

/// Snapshot projection returned by status and list operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatus {
    pub username: String,
    pub failed_attempts: u32,
    pub locked: bool,
    pub last_failed_at: DateTime<Utc>,
    pub lockout_started_at: Option<DateTime<Utc>>,
    /// Whole seconds until the lock can release; zero when unlocked.
    pub remaining_lockout_secs: i64,
}

/// Aggregate counts over a snapshot iteration of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockoutStats {
    pub total_accounts: usize,
    pub locked_accounts: usize,
    pub active_accounts: usize,
    /// Records whose last failed attempt falls in the last five minutes.
    pub recent_failed_attempts: usize,
}

/// Administrative operations over the shared store.
///
/// These operate directly on the [`LockoutStore`] (there is no privileged
/// path into the attempt-processing surface), and every mutation goes
/// through the same atomic per-key primitives as attempt processing.
#[derive(Clone)]
pub struct AccountAdmin {
    store: Arc<LockoutStore>,
    policy: LockoutPolicy,
    clock: Arc<dyn Clock>,
}

impl AccountAdmin {
    pub fn new(store: Arc<LockoutStore>, policy: LockoutPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    /// Current status of one account.
    pub fn status(&self, username: &str) -> Result<AccountStatus, Error> {
        let username = self.lookup_key(username)?;
        let record = self
            .store
            .get(&username)
            .ok_or(Error::AccountNotFound { username })?;
        Ok(self.project(&record))
    }

    /// Remove the record entirely, forgetting all attempt history.
    pub fn reset(&self, username: &str) -> Result<(), Error> {
        let username = self.lookup_key(username)?;
        if !self.store.remove(&username) {
            return Err(Error::AccountNotFound { username });
        }
        info!(username = %username, "account record reset");
        Ok(())
    }

    /// Clear the lock and counter on an existing record.
    ///
    /// Distinct from [`reset`](Self::reset): the record survives with
    /// `failed_attempts` at zero.
    pub fn unlock(&self, username: &str) -> Result<AccountStatus, Error> {
        let username = self.lookup_key(username)?;
        let updated = self.store.update_existing(&username, |record| {
            let mut next = record.clone();
            next.failed_attempts = 0;
            next.locked = false;
            next.lockout_started_at = None;
            (next, ())
        });

        match updated {
            Some((record, ())) => {
                info!(username = %username, "account manually unlocked");
                Ok(self.project(&record))
            }
            None => Err(Error::AccountNotFound { username }),
        }
    }

    /// Remove every record; returns how many were removed.
    pub fn clear_all(&self) -> usize {
        let removed = self.store.clear();
        warn!(removed = removed, "all account records cleared");
        removed
    }

    /// Aggregate counts for monitoring.
    ///
    /// Computed over a snapshot iteration: not linearizable with concurrent
    /// writers, which is fine for a monitoring view.
    pub fn statistics(&self) -> LockoutStats {
        let cutoff = self.clock.now() - Duration::minutes(RECENT_FAILURE_WINDOW_MINUTES);
        let mut total = 0;
        let mut locked = 0;
        let mut recent = 0;

        for record in self.store.snapshots() {
            total += 1;
            if record.locked {
                locked += 1;
            }
            if record.last_failed_at > cutoff {
                recent += 1;
            }
        }

        LockoutStats {
            total_accounts: total,
            locked_accounts: locked,
            active_accounts: total - locked,
            recent_failed_attempts: recent,
        }
    }

    /// Status projection of every record in the store.
    pub fn list_accounts(&self) -> Vec<AccountStatus> {
        self.store
            .snapshots()
            .iter()
            .map(|record| self.project(record))
            .collect()
    }

    fn lookup_key(&self, username: &str) -> Result<String, Error> {
        let username = normalize_username(username);
        if username.is_empty() {
            return Err(Error::InvalidUsername);
        }
        Ok(username)
    }

    fn project(&self, record: &AccountRecord) -> AccountStatus {
        let remaining_lockout_secs = match record.lockout_started_at {
            Some(started) if record.locked => {
                let elapsed = self.clock.now() - started;
                (self.policy.unlock_window - elapsed).num_seconds().max(0)
            }
            _ => 0,
        };

        AccountStatus {
            username: record.username.clone(),
            failed_attempts: record.failed_attempts,
            locked: record.locked,
            last_failed_at: record.last_failed_at,
            lockout_started_at: record.lockout_started_at,
            remaining_lockout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    struct Harness {
        lockout: LockoutService,
        admin: AccountAdmin,
        clock: Arc<ManualClock>,
    }

    fn harness(policy: LockoutPolicy) -> Harness {
        let store = Arc::new(LockoutStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        Harness {
            lockout: LockoutService::new(store.clone(), policy.clone(), clock.clone()),
            admin: AccountAdmin::new(store, policy, clock.clone()),
            clock,
        }
    }

    fn fail(h: &Harness, username: &str) -> Decision {
        h.lockout
            .process_attempt(username, false)
            .expect("valid username")
    }

    fn succeed(h: &Harness, username: &str) -> Decision {
        h.lockout
            .process_attempt(username, true)
            .expect("valid username")
    }

    #[test]
    fn empty_username_is_rejected_before_the_store() {
        let h = harness(LockoutPolicy::default());
        assert_eq!(
            h.lockout.process_attempt("   ", false),
            Err(Error::InvalidUsername)
        );
        assert!(h.admin.list_accounts().is_empty());
    }

    #[test]
    fn scenario_five_failures_lock_and_window_elapses() {
        let h = harness(LockoutPolicy::default());

        for k in 1..=4u32 {
            assert_eq!(
                fail(&h, "alice"),
                Decision::Rejected {
                    attempt: k,
                    threshold: 5
                }
            );
        }

        // Fifth failure locks for the full window.
        assert_eq!(
            fail(&h, "alice"),
            Decision::Locked {
                remaining: Duration::minutes(1)
            }
        );

        // Sixth attempt, 10s in: still locked, remaining has shrunk.
        h.clock.advance(Duration::seconds(10));
        assert_eq!(
            fail(&h, "alice"),
            Decision::Locked {
                remaining: Duration::seconds(50)
            }
        );

        // 61s after the lock started, the next failure re-enters counting.
        h.clock.advance(Duration::seconds(51));
        assert_eq!(
            fail(&h, "alice"),
            Decision::Rejected {
                attempt: 1,
                threshold: 5
            }
        );
    }

    #[test]
    fn scenario_first_ever_attempt_with_success_signal() {
        let h = harness(LockoutPolicy::default());

        assert_eq!(succeed(&h, "bob"), Decision::Allowed);

        let status = h.admin.status("bob").expect("record exists");
        assert_eq!(status.failed_attempts, 0);
        assert!(!status.locked);
        assert_eq!(status.remaining_lockout_secs, 0);
    }

    #[test]
    fn scenario_clear_all_empties_the_store() {
        let h = harness(LockoutPolicy::default());
        for i in 0..10 {
            fail(&h, &format!("user{i}"));
        }

        assert_eq!(h.admin.clear_all(), 10);
        let stats = h.admin.statistics();
        assert_eq!(
            stats,
            LockoutStats {
                total_accounts: 0,
                locked_accounts: 0,
                active_accounts: 0,
                recent_failed_attempts: 0,
            }
        );
    }

    #[test]
    fn lock_ignores_success_signal_until_window_elapses() {
        let h = harness(LockoutPolicy::new(2, Duration::minutes(1)));

        fail(&h, "alice");
        assert!(matches!(fail(&h, "alice"), Decision::Locked { .. }));

        // Within the window even a flagged-successful attempt is blocked.
        h.clock.advance(Duration::seconds(30));
        assert_eq!(
            succeed(&h, "alice"),
            Decision::Locked {
                remaining: Duration::seconds(30)
            }
        );

        // After the window a success unlocks and resets.
        h.clock.advance(Duration::seconds(31));
        assert_eq!(succeed(&h, "alice"), Decision::Allowed);
        assert_eq!(h.admin.status("alice").unwrap().failed_attempts, 0);
    }

    #[test]
    fn usernames_collide_after_normalization() {
        let h = harness(LockoutPolicy::default());

        fail(&h, "Alice");
        fail(&h, " alice ");
        fail(&h, "ALICE");

        let status = h.admin.status("aLiCe").expect("one shared record");
        assert_eq!(status.username, "alice");
        assert_eq!(status.failed_attempts, 3);
        assert_eq!(h.admin.list_accounts().len(), 1);
    }

    #[test]
    fn status_reports_remaining_lockout_seconds() {
        let h = harness(LockoutPolicy::new(1, Duration::minutes(1)));

        fail(&h, "alice");
        h.clock.advance(Duration::seconds(15));

        let status = h.admin.status("alice").unwrap();
        assert!(status.locked);
        assert_eq!(status.remaining_lockout_secs, 45);

        // Once the window has passed the projection clamps at zero.
        h.clock.advance(Duration::minutes(2));
        assert_eq!(h.admin.status("alice").unwrap().remaining_lockout_secs, 0);
    }

    #[test]
    fn status_of_unknown_account_is_not_found() {
        let h = harness(LockoutPolicy::default());
        assert_eq!(
            h.admin.status("ghost"),
            Err(Error::AccountNotFound {
                username: "ghost".into()
            })
        );
    }

    #[test]
    fn reset_deletes_and_is_idempotent() {
        let h = harness(LockoutPolicy::default());
        fail(&h, "alice");

        assert_eq!(h.admin.reset("alice"), Ok(()));
        assert_eq!(
            h.admin.status("alice"),
            Err(Error::AccountNotFound {
                username: "alice".into()
            })
        );
        // A second reset is NotFound, not a hard failure.
        assert_eq!(
            h.admin.reset("alice"),
            Err(Error::AccountNotFound {
                username: "alice".into()
            })
        );
    }

    #[test]
    fn unlock_keeps_the_record_but_clears_state() {
        let h = harness(LockoutPolicy::new(2, Duration::minutes(5)));

        fail(&h, "alice");
        fail(&h, "alice");
        assert!(h.admin.status("alice").unwrap().locked);

        let status = h.admin.unlock("alice").expect("record exists");
        assert!(!status.locked);
        assert_eq!(status.failed_attempts, 0);
        assert_eq!(status.remaining_lockout_secs, 0);

        // Unlike reset, the record is still there.
        assert!(h.admin.status("alice").is_ok());

        // And the next failure counts from one again.
        assert_eq!(
            fail(&h, "alice"),
            Decision::Rejected {
                attempt: 1,
                threshold: 2
            }
        );
    }

    #[test]
    fn unlock_of_unknown_account_is_not_found() {
        let h = harness(LockoutPolicy::default());
        assert_eq!(
            h.admin.unlock("ghost"),
            Err(Error::AccountNotFound {
                username: "ghost".into()
            })
        );
    }

    #[test]
    fn statistics_partition_locked_and_active() {
        let h = harness(LockoutPolicy::new(1, Duration::minutes(10)));

        fail(&h, "locked1");
        fail(&h, "locked2");
        succeed(&h, "active1");

        let stats = h.admin.statistics();
        assert_eq!(stats.total_accounts, 3);
        assert_eq!(stats.locked_accounts, 2);
        assert_eq!(stats.active_accounts, 1);
    }

    #[test]
    fn statistics_recent_window_excludes_old_failures() {
        let h = harness(LockoutPolicy::default());

        fail(&h, "old");
        h.clock.advance(Duration::minutes(6));
        fail(&h, "fresh");

        let stats = h.admin.statistics();
        assert_eq!(stats.total_accounts, 2);
        assert_eq!(stats.recent_failed_attempts, 1);
    }

    #[test]
    fn concurrent_failures_for_one_username_all_count() {
        let h = harness(LockoutPolicy::new(500, Duration::minutes(1)));
        let threads: u32 = 4;
        let per_thread: u32 = 25;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let lockout = h.lockout.clone();
                std::thread::spawn(move || {
                    for _ in 0..per_thread {
                        lockout
                            .process_attempt("alice", false)
                            .expect("valid username");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker thread panicked");
        }

        let status = h.admin.status("alice").expect("record exists");
        assert_eq!(status.failed_attempts, threads * per_thread);
        assert!(!status.locked);
    }

    #[test]
    fn list_accounts_projects_every_record() {
        let h = harness(LockoutPolicy::new(1, Duration::minutes(1)));

        fail(&h, "alice");
        succeed(&h, "bob");

        let mut accounts = h.admin.list_accounts();
        accounts.sort_by(|a, b| a.username.cmp(&b.username));

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].username, "alice");
        assert!(accounts[0].locked);
        assert!(accounts[0].remaining_lockout_secs > 0);
        assert_eq!(accounts[1].username, "bob");
        assert!(!accounts[1].locked);
    }
}
