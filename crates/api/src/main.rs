//! `stemsight-api` -- dashboard REST API, notification sockets and live
//! camera streams.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stemsight_api::config::ServerConfig;
use stemsight_api::notifications::NotificationForwarder;
use stemsight_api::router::build_app_router;
use stemsight_api::state::AppState;
use stemsight_api::streaming::StreamHub;
use stemsight_api::ws;
use stemsight_db::repositories::SessionRepo;
use stemsight_events::{EmailConfig, EmailDelivery, EventBus};

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stemsight_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");
    match &config.stream_recording_dir {
        Some(dir) => tracing::info!(dir = %dir.display(), "Live stream recording enabled"),
        None => tracing::info!("Live stream recording disabled"),
    }

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = stemsight_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    stemsight_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    stemsight_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let email = email_delivery();

    // --- WebSocket manager + heartbeat ---
    let ws_manager = Arc::new(ws::WsManager::new());
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager));

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let forwarder = NotificationForwarder::new(Arc::clone(&ws_manager));
    let forwarder_handle = tokio::spawn(forwarder.run(event_bus.subscribe()));

    let cleanup_handle = spawn_session_cleanup(pool.clone());

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        event_bus: Arc::clone(&event_bus),
        stream_hub: Arc::new(StreamHub::default()),
        email,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);

    cleanup_handle.abort();

    // Closing the bus ends the forwarder loop.
    drop(event_bus);
    let _ = tokio::time::timeout(shutdown_timeout, forwarder_handle).await;

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    heartbeat_handle.abort();
    tracing::info!("Graceful shutdown complete");
}

/// SMTP sender for password resets, or `None` to log reset links.
fn email_delivery() -> Option<Arc<EmailDelivery>> {
    let Some(cfg) = EmailConfig::from_env() else {
        tracing::warn!("SMTP_HOST not set, password reset links will be logged");
        return None;
    };
    match EmailDelivery::new(&cfg) {
        Ok(delivery) => {
            tracing::info!(smtp_host = %cfg.smtp_host, "Password reset email enabled");
            Some(Arc::new(delivery))
        }
        Err(e) => {
            tracing::error!(error = %e, "Invalid SMTP configuration, password reset links will be logged");
            None
        }
    }
}

/// Hourly purge of spent and expired refresh sessions.
fn spawn_session_cleanup(pool: stemsight_db::DbPool) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            ticker.tick().await;
            match SessionRepo::purge_stale(&pool).await {
                Ok(removed) => tracing::debug!(removed, "Expired sessions cleaned up"),
                Err(e) => tracing::error!(error = %e, "Session cleanup failed"),
            }
        }
    })
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
