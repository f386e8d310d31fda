//! Account lockout service binary.
//!
//! Reads its configuration from the environment once at startup, wires the
//! shared store into both surfaces, and serves the router with permissive
//! CORS (the identity orchestrator calls from another origin).

use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use lockdown_core::{AccountAdmin, LockoutPolicy, LockoutService, LockoutStore, SystemClock};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

/// Parse an env var as an integer, falling back to `default` when unset.
fn env_u32(name: &str, default: u32) -> anyhow::Result<u32> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{name} must be an integer, got {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let threshold = env_u32("LOCKOUT_THRESHOLD", 5)?;
    let window_minutes = env_u32("UNLOCK_WINDOW_MINUTES", 1)?;
    let port = env_u32("PORT", 8080)?;

    let policy = LockoutPolicy::new(threshold, Duration::minutes(i64::from(window_minutes)));
    let store = Arc::new(LockoutStore::new());
    let clock = Arc::new(SystemClock);

    let lockout = Arc::new(LockoutService::new(
        store.clone(),
        policy.clone(),
        clock.clone(),
    ));
    let admin = Arc::new(AccountAdmin::new(store, policy.clone(), clock));

    let app = lockdown_axum::create_router(lockout, admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::new());

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        %addr,
        threshold = policy.threshold,
        unlock_window_minutes = policy.unlock_window_minutes(),
        "lockdown service listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
