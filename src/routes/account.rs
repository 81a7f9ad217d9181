use crate::{AppState, handlers, session::Role};
use axum::{Router, routing::get};

/// Every role holds a session, so the whole closed set is allowed here; the
/// guard still redirects anonymous clients to login.
pub const ALLOWED_ROLES: &[Role] = &[Role::Admin, Role::Guide, Role::Tourist];

/// Account Router Module
///
/// Routes available to any authenticated session regardless of role.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        // GET /me
        // The identity attached to the current session.
        .route("/me", get(handlers::get_me))
}
