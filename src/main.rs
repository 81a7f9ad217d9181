use std::sync::Arc;

use tokio::net::TcpListener;
use tour_portal::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    repository::{InMemoryRepository, RepositoryState},
    session::{Session, SessionStore, SessionUser},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// main
///
/// The asynchronous entry point, responsible for initializing all core
/// components: Configuration, Logging, the Session Store, the Repository,
/// and the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    // AppConfig::load() aborts on configuration that would weaken the guard.
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // Prioritizes RUST_LOG, falling back to sensible local defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tour_portal=debug,tower_http=info,axum=trace".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            // LOCAL: pretty output for human readability during debugging.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON output for ingestion by centralized log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Session Store Initialization
    // Production always starts anonymous; a logged-in session only exists
    // after an explicit POST /session. Locally, DEV_SESSION_ROLE may seed a
    // synthetic session so guarded pages are reachable without a login flow.
    let session = match (&config.env, config.dev_session_role) {
        (Env::Local, Some(role)) => {
            tracing::warn!(%role, "seeding development session (Env::Local only)");
            Arc::new(SessionStore::with_session(Session::authenticated(SessionUser {
                id: Uuid::new_v4(),
                email: format!("dev-{role}@localhost"),
                role,
            })))
        }
        _ => Arc::new(SessionStore::new()),
    };

    // 5. Repository Initialization (In-Memory Catalog)
    let repo = Arc::new(InMemoryRepository::seeded()) as RepositoryState;

    // 6. Unified State Assembly
    let app_state = AppState {
        session,
        repo,
        config: config.clone(),
    };

    // 7. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .expect("FATAL: failed to bind listener. Check BIND_ADDR.");

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on {}", config.bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: server error");
}
