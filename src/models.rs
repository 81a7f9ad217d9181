use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::session::Role;

// --- Core Application Schemas ---

/// Tour
///
/// A bookable tour in the catalog. This is the primary data structure served
/// by the public catalog endpoints and moderated through the admin surface.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Tour {
    pub id: Uuid,
    pub title: String,
    pub destination: String,
    pub description: String,
    /// Price per seat, in the smallest currency unit.
    pub price_cents: i64,
    pub capacity: u32,
    /// The guide assigned to run this tour, if one has been assigned yet.
    pub guide_id: Option<Uuid>,
    /// Controls public visibility. Unpublished tours are only visible through
    /// the admin listing and the assigned guide's itinerary.
    pub is_published: bool,
    #[ts(type = "string")]
    pub starts_at: DateTime<Utc>,
}

/// Booking
///
/// A tourist's reservation on a tour. Owner-only: bookings are listed and
/// cancelled strictly by the user id resolved from the session.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Booking {
    pub id: Uuid,
    pub tour_id: Uuid,
    /// FK to the booking owner (the tourist who made it).
    pub user_id: Uuid,
    pub seats: u32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload for POST /session. This is trusted input: the external
/// identity provider has already verified credentials before posting the
/// resolved identity here, so the payload carries no password. An unknown
/// role string fails serde deserialization and never reaches the session.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// CreateBookingRequest
///
/// Input payload for reserving seats on a tour (POST /bookings). The owner
/// is never part of the payload; it comes from the session.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateBookingRequest {
    pub tour_id: Uuid,
    pub seats: u32,
}

/// TourFilter
///
/// Accepted query parameters for the public catalog listing (GET /tours).
#[derive(Deserialize, utoipa::IntoParams)]
pub struct TourFilter {
    /// Optional case-insensitive destination filter.
    pub destination: Option<String>,
    /// Optional full-text search over title and description.
    pub search: Option<String>,
}

// --- Dashboard & Profile Schemas (Output) ---

/// AdminDashboardStats
///
/// Output schema for the administrative statistics endpoint (GET /admin/stats).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminDashboardStats {
    pub total_tours: i64,
    pub total_bookings: i64,
    /// Tours with `is_published` still false, awaiting review.
    pub unpublished_tours: i64,
}
