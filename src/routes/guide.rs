use crate::{AppState, handlers, session::Role};
use axum::{Router, routing::get};

pub const ALLOWED_ROLES: &[Role] = &[Role::Guide];

/// Guide Router Module
///
/// Routes exclusively accessible to the 'guide' role. A guide sees every
/// tour assigned to them, published or not, since an unpublished tour still
/// needs preparation before review completes.
pub fn guide_routes() -> Router<AppState> {
    Router::new()
        // GET /guide/itinerary
        // Tours assigned to the current guide, soonest departure first.
        .route("/guide/itinerary", get(handlers::get_guide_itinerary))
}
