//! Core functionality for the lockdown service
//!
//! This crate implements the account lockout state machine and its concurrent
//! storage: given a stream of sign-in attempt events keyed by username, it
//! maintains per-account failure counters and lock windows and produces
//! race-free, temporally-correct decisions.
//!
//! The pieces are deliberately small and layered:
//!
//! - [`Clock`] supplies the current time and is injectable so that time can be
//!   simulated in tests.
//! - [`LockoutStore`] owns every [`AccountRecord`] and exposes a single atomic
//!   per-key update primitive; callers never perform separate
//!   load-mutate-store steps themselves.
//! - [`engine`] holds the pure transition rules mapping
//!   `(record, attempt, now)` to `(next record, decision)`.
//! - [`LockoutService`] and [`AccountAdmin`] are the two surfaces an HTTP
//!   layer builds on. Both are handed the same shared store at construction
//!   time; neither reaches into the other's internals.
//!
//! All work is in-memory and short, so the whole crate is synchronous. State
//! is per-process and is not persisted across restarts.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod record;
pub mod service;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LockoutPolicy;
pub use engine::{Attempt, Decision};
pub use error::Error;
pub use record::{AccountRecord, normalize_username};
pub use service::{AccountAdmin, AccountStatus, LockoutService, LockoutStats};
pub use store::LockoutStore;
