//! # Lockdown Axum Integration
//!
//! Axum routes for the lockdown account lockout service. The router exposes
//! the sign-in decision callback an identity orchestrator invokes on every
//! attempt, plus the read/mutate administrative endpoints, and maps core
//! decisions and errors onto HTTP status codes:
//!
//! - `POST /signin`: 200 allowed, 401 rejected, 429 locked, 400 bad input
//! - `GET /status/{username}`, `GET /stats`, `GET /accounts`, `GET /health`
//! - `POST /reset/{username}`, `POST /unlock/{username}`, `POST /clear-all`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lockdown_core::{AccountAdmin, LockoutPolicy, LockoutService, LockoutStore, SystemClock};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(LockoutStore::new());
//!     let policy = LockoutPolicy::default();
//!     let clock = Arc::new(SystemClock);
//!
//!     let lockout = Arc::new(LockoutService::new(store.clone(), policy.clone(), clock.clone()));
//!     let admin = Arc::new(AccountAdmin::new(store, policy, clock));
//!
//!     let app = lockdown_axum::create_router(lockout, admin);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

mod error;
mod routes;
mod types;

pub use error::{ApiError, Result};
pub use routes::{AppState, create_router};
pub use types::{ApiResponse, ClearAllResponse, HealthResponse, SignInRequest, StatsResponse};
