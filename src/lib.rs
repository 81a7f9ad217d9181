use axum::{
    Router,
    extract::{FromRef, Request, State},
    http::HeaderName,
    middleware::{self, Next},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod config;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod session;

// Module for routing segregation (Public, Account, Tourist, Guide, Admin).
pub mod routes;
use routes::{account, admin, guide, public, tourist};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use repository::{InMemoryRepository, RepositoryState};
pub use session::{SessionState, SessionStore};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the portal.
/// It aggregates all API paths and data schemas decorated with the
/// `#[utoipa::path]` and `#[derive(utoipa::ToSchema)]` macros.
/// The resulting JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login, handlers::logout, handlers::get_me,
        handlers::get_tours, handlers::get_featured_tours, handlers::get_tour_details,
        handlers::create_booking, handlers::get_my_bookings, handlers::cancel_booking,
        handlers::get_guide_itinerary, handlers::get_admin_stats, handlers::get_admin_tours,
        handlers::update_tour_status,
    ),
    components(
        schemas(
            models::Tour, models::Booking, models::CreateBookingRequest,
            models::LoginRequest, models::AdminDashboardStats,
            session::Session, session::SessionUser, session::Role,
        )
    ),
    tags(
        (name = "tour-portal", description = "Tour booking portal API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe container holding all essential application
/// services and configuration, shared across all incoming requests. The
/// session store is the only mutable member, and it is only ever mutated
/// through its two entry points (`login`/`logout`).
#[derive(Clone)]
pub struct AppState {
    /// The application-wide session store read by every route evaluation.
    pub session: SessionState,
    /// Catalog and booking access behind the `Repository` trait object.
    pub repo: RepositoryState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These let extractors and middleware selectively pull components from the
// shared AppState instead of depending on the whole container.

impl FromRef<AppState> for SessionState {
    fn from_ref(app_state: &AppState) -> SessionState {
        app_state.session.clone()
    }
}

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the application's entire routing structure, applies the route
/// guard to each protected group, layers the observability stack, and
/// registers the application state.
///
/// Every protected group is wrapped in `guard::enforce` with the group's own
/// `ALLOWED_ROLES` declaration, so the guard decision is re-evaluated from a
/// fresh session snapshot on every request — a login, logout, or role change
/// affects the very next navigation.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public Routes: No guard applied.
        .merge(public::public_routes())
        // Account Routes: any authenticated role.
        .merge(account::account_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            |State(st): State<AppState>, req: Request, next: Next| async move {
                guard::enforce(st, account::ALLOWED_ROLES, req, next).await
            },
        )))
        // Tourist Routes: booking features.
        .merge(tourist::tourist_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            |State(st): State<AppState>, req: Request, next: Next| async move {
                guard::enforce(st, tourist::ALLOWED_ROLES, req, next).await
            },
        )))
        // Guide Routes: itinerary.
        .merge(guide::guide_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            |State(st): State<AppState>, req: Request, next: Next| async move {
                guard::enforce(st, guide::ALLOWED_ROLES, req, next).await
            },
        )))
        // Admin Routes: moderation and oversight.
        .merge(admin::admin_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            |State(st): State<AppState>, req: Request, next: Next| async move {
                guard::enforce(st, admin::ALLOWED_ROLES, req, next).await
            },
        )))
        // Apply the shared state to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: wraps the request/response lifecycle in a
                // tracing span carrying the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: returns x-request-id to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Helper used by `TraceLayer` to customize span creation: extracts the
/// `x-request-id` header (if present) and includes it in the structured
/// logging metadata alongside the HTTP method and URI, so every log line for
/// a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
