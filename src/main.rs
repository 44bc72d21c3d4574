// SPDX-License-Identifier: MIT

//! Skolae-iCal server
//!
//! Periodically pulls the MyGES agenda from the Kordis API, converts it
//! to an iCalendar document and serves it on a single HTTP endpoint.

use std::sync::Arc;
use std::time::Duration;

use skolae_ical::{config::Config, routes, AppState};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        port = config.port,
        interval_minutes = config.fetch_interval_minutes,
        timezone = %config.timezone,
        "Starting skolae-ical"
    );

    let state = Arc::new(AppState::new(config));

    // One shutdown signal shared by the scheduler and the server.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let scheduler = tokio::spawn(run_scheduler(state.clone(), shutdown_rx.clone()));

    // Start server
    let app = routes::create_router(state.clone());
    let addr = format!("0.0.0.0:{}", state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    let mut server_shutdown = shutdown_rx.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.changed().await;
        })
        .await?;

    scheduler.await?;
    tracing::info!("Exiting");
    Ok(())
}

/// Refresh the calendar on a fixed interval until shutdown.
///
/// The first tick fires immediately so the cache is warm before the
/// first subscriber poll. A failed tick is logged and dropped; the
/// previous cache stays authoritative until the next one.
async fn run_scheduler(state: Arc<AppState>, mut shutdown: watch::Receiver<bool>) {
    let minutes = state.config.fetch_interval_minutes.max(1);
    let mut ticker = tokio::time::interval(Duration::from_secs(minutes * 60));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = state.calendar.refresh().await {
                    tracing::error!(error = %e, "Scheduled refresh failed");
                }
            }
            _ = shutdown.changed() => {
                tracing::info!("Scheduler shut down");
                break;
            }
        }
    }
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize logging with an env-filter overridable via `RUST_LOG`.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skolae_ical=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
