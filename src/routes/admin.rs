use crate::{AppState, handlers, session::Role};
use axum::{
    Router,
    routing::{get, put},
};

pub const ALLOWED_ROLES: &[Role] = &[Role::Admin];

/// Admin Router Module
///
/// Defines the routes exclusively accessible to sessions with the 'admin'
/// role: moderation, oversight, and statistics.
///
/// Access Control:
/// This entire router is wrapped in the route-guard layer with
/// `ALLOWED_ROLES = [admin]` in `create_router`. Any other role is
/// redirected to the unauthorized notice before a handler runs.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/stats
        // Core dashboard metrics (total tours, bookings, pending reviews).
        .route("/admin/stats", get(handlers::get_admin_stats))
        // GET /admin/tours
        // Lists ALL tours, including unpublished ones awaiting review.
        .route("/admin/tours", get(handlers::get_admin_tours))
        // PUT /admin/tours/{id}/status
        // Publishes or hides a tour. The core moderation endpoint.
        .route("/admin/tours/{id}/status", put(handlers::update_tour_status))
}
