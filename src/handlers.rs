use crate::{
    AppState,
    models::{
        AdminDashboardStats, Booking, CreateBookingRequest, LoginRequest, Tour, TourFilter,
    },
    session::{CurrentUser, Role, Session, SessionUser},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use uuid::Uuid;

// --- Session Handlers ---

/// login
///
/// [Public Route] Establishes an authenticated session from a resolved
/// identity. Credentials are verified by the external identity provider
/// before this endpoint is called; the payload is trusted input. A repeated
/// login overwrites the current session wholesale (account switch), and an
/// unknown role string is rejected by deserialization before the store is
/// ever touched.
#[utoipa::path(
    post,
    path = "/session",
    request_body = LoginRequest,
    responses((status = 200, description = "Session established", body = Session))
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Json<Session> {
    let user = SessionUser {
        id: payload.id,
        email: payload.email,
        role: payload.role,
    };
    tracing::info!(user_id = %user.id, role = %user.role, "session login");
    state.session.login(user);
    Json(state.session.snapshot())
}

/// logout
///
/// [Public Route] Clears the session back to anonymous. Idempotent at the
/// store level (clearing an anonymous session is a no-op), and the very next
/// guarded navigation observes the anonymous state and redirects to login.
#[utoipa::path(
    delete,
    path = "/session",
    responses((status = 204, description = "Session cleared"))
)]
pub async fn logout(State(state): State<AppState>) -> StatusCode {
    tracing::info!("session logout");
    state.session.logout();
    StatusCode::NO_CONTENT
}

/// get_me
///
/// [Account Route] Returns the identity attached to the current session.
/// The `CurrentUser` extractor rejects anonymous sessions with 401.
#[utoipa::path(
    get,
    path = "/me",
    responses((status = 200, description = "Current identity", body = SessionUser))
)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<SessionUser> {
    Json(user)
}

/// login_page
///
/// [Public Route] The fixed login entry point the guard redirects anonymous
/// sessions to. Rendering the real form belongs to the web client; this
/// placeholder keeps the redirect target resolvable.
pub async fn login_page() -> Html<&'static str> {
    Html("<h1>Sign in</h1><p>Please sign in to continue.</p>")
}

/// unauthorized_page
///
/// [Public Route] The fixed notice the guard redirects to when a session's
/// role is not permitted for the requested route.
pub async fn unauthorized_page() -> Html<&'static str> {
    Html("<h1>Not authorized</h1><p>Your account does not have access to that page.</p>")
}

// --- Catalog Handlers ---

/// get_tours
///
/// [Public Route] Lists published tours with destination filtering and search.
///
/// *Security*: the repository applies the `is_published=true` filter
/// **unconditionally**, so hidden tours never leak to anonymous users.
#[utoipa::path(
    get,
    path = "/tours",
    params(TourFilter),
    responses((status = 200, description = "List filtered tours", body = [Tour]))
)]
pub async fn get_tours(
    State(state): State<AppState>,
    Query(filter): Query<TourFilter>,
) -> Json<Vec<Tour>> {
    let tours = state.repo.get_tours(filter.destination, filter.search).await;
    Json(tours)
}

/// get_featured_tours
///
/// [Public Route] The next departures for the landing page.
#[utoipa::path(
    get,
    path = "/tours/featured",
    responses((status = 200, description = "Featured tours", body = [Tour]))
)]
pub async fn get_featured_tours(State(state): State<AppState>) -> Json<Vec<Tour>> {
    let tours = state.repo.get_featured_tours(3).await;
    Json(tours)
}

/// get_tour_details
///
/// [Public Route] Retrieves a single published tour by ID. Unknown and
/// unpublished ids are indistinguishable (both 404).
#[utoipa::path(
    get,
    path = "/tours/{id}",
    params(("id" = Uuid, Path, description = "Tour ID")),
    responses((status = 200, description = "Found", body = Tour))
)]
pub async fn get_tour_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tour>, StatusCode> {
    match state.repo.get_tour(id).await {
        Some(tour) => Ok(Json(tour)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

// --- Booking Handlers ---

/// create_booking
///
/// [Tourist Route] Reserves seats on a published tour. The booking owner is
/// the session identity, never part of the payload.
#[utoipa::path(
    post,
    path = "/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booked", body = Booking),
        (status = 404, description = "Tour not found")
    )
)]
pub async fn create_booking(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), StatusCode> {
    match state.repo.create_booking(payload, user.id).await {
        Some(booking) => Ok((StatusCode::CREATED, Json(booking))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// get_my_bookings
///
/// [Tourist Route] Lists the bookings owned by the session identity.
#[utoipa::path(
    get,
    path = "/me/bookings",
    responses((status = 200, description = "My bookings", body = [Booking]))
)]
pub async fn get_my_bookings(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Json<Vec<Booking>> {
    let bookings = state.repo.get_my_bookings(user.id).await;
    Json(bookings)
}

/// cancel_booking
///
/// [Tourist Route] Cancels one of the caller's own bookings.
///
/// *Authorization*: the repository enforces an **Owner-Only** check against
/// the session identity; a mismatch affects no rows and surfaces as 404, so
/// foreign booking ids cannot be probed.
#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    responses(
        (status = 204, description = "Cancelled"),
        (status = 404, description = "Not found or not owner")
    )
)]
pub async fn cancel_booking(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if state.repo.cancel_booking(id, user.id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

// --- Guide Handlers ---

/// get_guide_itinerary
///
/// [Guide Route] Lists the tours assigned to the current guide, including
/// tours still awaiting publication.
#[utoipa::path(
    get,
    path = "/guide/itinerary",
    responses((status = 200, description = "Assigned tours", body = [Tour]))
)]
pub async fn get_guide_itinerary(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Json<Vec<Tour>> {
    let tours = state.repo.get_guide_tours(user.id).await;
    Json(tours)
}

// --- Admin Handlers ---

/// get_admin_stats
///
/// [Admin Route] Core dashboard metrics for oversight.
///
/// *RBAC*: the guard layer already restricts this group to admins; the
/// in-handler check is the second, independent layer.
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses((status = 200, description = "Dashboard stats", body = AdminDashboardStats))
)]
pub async fn get_admin_stats(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<AdminDashboardStats>, StatusCode> {
    if user.role != Role::Admin {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.get_stats().await))
}

/// get_admin_tours
///
/// [Admin Route] Lists ALL tours, including unpublished ones awaiting review.
#[utoipa::path(
    get,
    path = "/admin/tours",
    responses((status = 200, description = "All tours", body = [Tour]))
)]
pub async fn get_admin_tours(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Tour>>, StatusCode> {
    if user.role != Role::Admin {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.get_all_tours().await))
}

/// update_tour_status
///
/// [Admin Route] Publishes or hides a tour. The request body is the bare
/// desired `is_published` value.
///
/// *RBAC*: strict enforcement of the admin role before calling the repository.
#[utoipa::path(
    put,
    path = "/admin/tours/{id}/status",
    params(("id" = Uuid, Path, description = "Tour ID")),
    request_body = bool,
    responses(
        (status = 200, description = "Updated", body = Tour),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_tour_status(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(is_published): Json<bool>,
) -> Result<Json<Tour>, StatusCode> {
    if user.role != Role::Admin {
        return Err(StatusCode::FORBIDDEN);
    }
    match state.repo.set_tour_status(id, is_published).await {
        Some(tour) => Ok(Json(tour)),
        None => Err(StatusCode::NOT_FOUND),
    }
}
