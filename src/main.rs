//! Portfolio Backend
//!
//! Serves the profile, skills and projects of a single-page portfolio site and
//! accepts contact form submissions, relaying them by email.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod notify;
mod validation;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use db::Repository;
use errors::AppError;
use notify::{ContactNotifier, LogNotifier, NotificationQueue, SendGridNotifier};

/// How long shutdown waits for queued contact notifications.
const NOTIFY_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub notifications: NotificationQueue,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting Portfolio Backend");
    tracing::info!("Bind address: {}", config.bind_addr);
    match &config.static_dir {
        Some(dir) => tracing::info!("Serving frontend from {:?}", dir),
        None => tracing::info!("No static directory configured, serving API only"),
    }
    if config.admin_routes {
        tracing::warn!("Admin routes are mounted without authentication (PORTFOLIO_ADMIN_ROUTES)");
    }

    // Seed the content store
    let repo = Arc::new(db::init_repository());

    // Contact notification relay
    let notifier: Arc<dyn ContactNotifier> = match &config.email.sendgrid_api_key {
        Some(key) => Arc::new(SendGridNotifier::new(
            key.clone(),
            config.email.to.clone(),
            config.email.from.clone(),
        )?),
        None => {
            tracing::warn!("SENDGRID_API_KEY not set, contact submissions will only be logged");
            Arc::new(LogNotifier)
        }
    };
    tracing::info!("Contact notifier: {}", notifier.kind());
    let (notifications, notify_worker) = NotificationQueue::start(
        notifier,
        config.email.queue_capacity,
        config.email.retry_policy(),
    );

    // Create application state
    let state = AppState {
        repo,
        notifications,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router and every queue handle are gone now; let the worker drain.
    match tokio::time::timeout(NOTIFY_DRAIN_TIMEOUT, notify_worker).await {
        Ok(_) => tracing::info!("Notification queue drained"),
        Err(_) => tracing::warn!("Timed out draining notification queue"),
    }

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public API routes
    let mut api_routes = Router::new()
        .route("/profile", get(api::get_profile))
        .route("/skills", get(api::list_skills))
        .route("/skills/grouped", get(api::list_skill_groups))
        .route("/projects", get(api::list_projects))
        .route("/contact", post(api::submit_contact));

    // Content editing and inbox
    if state.config.admin_routes {
        api_routes = api_routes
            .route("/profile", post(api::create_profile).put(api::update_profile))
            .route("/skills", post(api::create_skill))
            .route("/projects", post(api::create_project))
            .route("/contacts", get(api::list_contacts));
    }

    let mut app = Router::new()
        .nest("/api", api_routes.fallback(api_not_found))
        .route("/health", get(health_check));

    // Built frontend with single-page fallback
    if let Some(dir) = &state.config.static_dir {
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).fallback(index));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
    .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// JSON 404 for unknown API paths.
async fn api_not_found() -> AppError {
    AppError::NotFound("No such API route".to_string())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests;
