use crate::{AppState, handlers, session::Role};
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Booking is a customer feature; guides and admins use their own surfaces.
pub const ALLOWED_ROLES: &[Role] = &[Role::Tourist];

/// Tourist Router Module
///
/// The booking features for the 'tourist' role.
///
/// Access Control Strategy:
/// The route guard layered on this group redirects anonymous sessions to
/// login and wrong-role sessions to the unauthorized notice. Handlers then
/// resolve the owner through the `CurrentUser` extractor, and the repository
/// enforces the Owner-Only checks (e.g. `cancel_booking`), giving each
/// booking operation two independent layers of protection.
pub fn tourist_routes() -> Router<AppState> {
    Router::new()
        // POST /bookings
        // Reserves seats on a published tour for the current session identity.
        .route("/bookings", post(handlers::create_booking))
        // GET /me/bookings
        // Lists the caller's own bookings.
        .route("/me/bookings", get(handlers::get_my_bookings))
        // DELETE /bookings/{id}
        // Cancels one of the caller's own bookings. Strict ownership check
        // is enforced at the repository layer.
        .route("/bookings/{id}", delete(handlers::cancel_booking))
}
