use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unguarded** and accessible to any client
/// (anonymous or logged-in): read-only catalog access, the session login
/// endpoint, and the two fixed redirect targets used by the route guard.
///
/// Security Mandate:
/// All catalog handlers in this module must enforce `is_published=true` at
/// the Repository level, so tours pending review or hidden by an admin are
/// never visible to anonymous browsing.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        .route("/health", get(|| async { "ok" }))
        // GET /login
        // The fixed login entry point. Anonymous sessions hitting any guarded
        // route are redirected here; the original destination is discarded.
        .route("/login", get(handlers::login_page))
        // GET /unauthorized
        // The fixed notice shown when an authenticated session's role is not
        // permitted for the route it requested.
        .route("/unauthorized", get(handlers::unauthorized_page))
        // POST /session — establishes a session from an externally verified
        // identity (trusted input: credential checks happen before this
        // endpoint). DELETE /session — logout. Logout is deliberately
        // unguarded: clearing an anonymous session is an observable no-op,
        // so redirecting the caller to login first would add nothing.
        .route("/session", post(handlers::login).delete(handlers::logout))
        // GET /tours?destination=...&search=...
        // Lists published tours with filtering and search.
        .route("/tours", get(handlers::get_tours))
        // GET /tours/featured
        // The next few departures, for the landing page.
        .route("/tours/featured", get(handlers::get_featured_tours))
        // GET /tours/{id}
        // Detailed view of a single published tour.
        .route("/tours/{id}", get(handlers::get_tour_details))
}
