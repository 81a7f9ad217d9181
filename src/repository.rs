use crate::models::{AdminDashboardStats, Booking, CreateBookingRequest, Tour};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for catalog and booking access, keeping the
/// handlers independent of the concrete data source (in-memory, mock, or a
/// future database-backed implementation).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Catalog Retrieval ---
    // Public listing with filtering. Must enforce is_published=true.
    async fn get_tours(&self, destination: Option<String>, search: Option<String>) -> Vec<Tour>;
    // Admin access: retrieves all tours regardless of publication status.
    async fn get_all_tours(&self) -> Vec<Tour>;
    // The next departures, for the landing page. Published tours only.
    async fn get_featured_tours(&self, limit: usize) -> Vec<Tour>;
    // Single published tour; returns None for unknown or unpublished ids.
    async fn get_tour(&self, id: Uuid) -> Option<Tour>;

    // --- Moderation ---
    // Admin action: changes the is_published status.
    async fn set_tour_status(&self, id: Uuid, is_published: bool) -> Option<Tour>;

    // --- Bookings ---
    // Creates a booking for user_id; None if the tour is unknown/unpublished.
    async fn create_booking(&self, req: CreateBookingRequest, user_id: Uuid) -> Option<Booking>;
    async fn get_my_bookings(&self, user_id: Uuid) -> Vec<Booking>;
    // Owner-Only: cancels only if user_id matches the booking's owner.
    async fn cancel_booking(&self, id: Uuid, user_id: Uuid) -> bool;

    // --- Guide & Admin Views ---
    // Tours assigned to a guide, published or not.
    async fn get_guide_tours(&self, guide_id: Uuid) -> Vec<Tour>;
    async fn get_stats(&self) -> AdminDashboardStats;
}

/// RepositoryState
///
/// The concrete type used to share data-layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// InMemoryRepository
///
/// Process-local implementation of the `Repository` trait. The portal's core
/// is the session/guard machinery; persistence is out of scope, so the data
/// layer is a pair of lock-guarded maps seeded with a small catalog.
#[derive(Default)]
pub struct InMemoryRepository {
    tours: RwLock<HashMap<Uuid, Tour>>,
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

impl InMemoryRepository {
    /// Creates an empty repository. Tests seed it explicitly via `insert_tour`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-loaded with a small demonstration catalog,
    /// including one unpublished tour so the admin review queue is non-empty.
    pub fn seeded() -> Self {
        let repo = Self::new();
        let now = Utc::now();

        repo.insert_tour(Tour {
            id: Uuid::new_v4(),
            title: "Old Town Walking Tour".to_string(),
            destination: "Lisbon".to_string(),
            description: "Three hours through the Alfama district with a local guide.".to_string(),
            price_cents: 4_500,
            capacity: 15,
            guide_id: Some(Uuid::new_v4()),
            is_published: true,
            starts_at: now + Duration::days(7),
        });
        repo.insert_tour(Tour {
            id: Uuid::new_v4(),
            title: "Fjord Kayaking Expedition".to_string(),
            destination: "Bergen".to_string(),
            description: "Full-day paddle with equipment and lunch included.".to_string(),
            price_cents: 18_900,
            capacity: 8,
            guide_id: Some(Uuid::new_v4()),
            is_published: true,
            starts_at: now + Duration::days(14),
        });
        repo.insert_tour(Tour {
            id: Uuid::new_v4(),
            title: "Night Market Food Crawl".to_string(),
            destination: "Taipei".to_string(),
            description: "Street-food sampler across three markets.".to_string(),
            price_cents: 6_200,
            capacity: 12,
            guide_id: None,
            is_published: false,
            starts_at: now + Duration::days(21),
        });

        repo
    }

    /// Inserts a tour directly, bypassing moderation. Seeding/tests only.
    pub fn insert_tour(&self, tour: Tour) {
        let mut tours = self
            .tours
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        tours.insert(tour.id, tour);
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    /// get_tours
    ///
    /// Public catalog listing. **Security**: strictly enforces
    /// `is_published == true` before any filter is applied, so hidden tours
    /// never leak to anonymous browsing regardless of the query.
    async fn get_tours(&self, destination: Option<String>, search: Option<String>) -> Vec<Tour> {
        let tours = self
            .tours
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut result: Vec<Tour> = tours
            .values()
            .filter(|t| t.is_published)
            .filter(|t| match &destination {
                Some(d) => t.destination.eq_ignore_ascii_case(d),
                None => true,
            })
            .filter(|t| match &search {
                Some(s) => {
                    let needle = s.to_lowercase();
                    t.title.to_lowercase().contains(&needle)
                        || t.description.to_lowercase().contains(&needle)
                }
                None => true,
            })
            .cloned()
            .collect();

        result.sort_by_key(|t| t.starts_at);
        result
    }

    async fn get_all_tours(&self) -> Vec<Tour> {
        let tours = self
            .tours
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut result: Vec<Tour> = tours.values().cloned().collect();
        result.sort_by_key(|t| t.starts_at);
        result
    }

    async fn get_featured_tours(&self, limit: usize) -> Vec<Tour> {
        let mut result = self.get_tours(None, None).await;
        result.truncate(limit);
        result
    }

    async fn get_tour(&self, id: Uuid) -> Option<Tour> {
        let tours = self
            .tours
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Unpublished tours are indistinguishable from missing ones here.
        tours.get(&id).filter(|t| t.is_published).cloned()
    }

    async fn set_tour_status(&self, id: Uuid, is_published: bool) -> Option<Tour> {
        let mut tours = self
            .tours
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let tour = tours.get_mut(&id)?;
        tour.is_published = is_published;
        Some(tour.clone())
    }

    async fn create_booking(&self, req: CreateBookingRequest, user_id: Uuid) -> Option<Booking> {
        // Booking is only possible against a visible tour.
        self.get_tour(req.tour_id).await?;

        let booking = Booking {
            id: Uuid::new_v4(),
            tour_id: req.tour_id,
            user_id,
            seats: req.seats,
            created_at: Utc::now(),
        };

        let mut bookings = self
            .bookings
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        bookings.insert(booking.id, booking.clone());
        Some(booking)
    }

    async fn get_my_bookings(&self, user_id: Uuid) -> Vec<Booking> {
        let bookings = self
            .bookings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut result: Vec<Booking> = bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by_key(|b| b.created_at);
        result
    }

    /// cancel_booking
    ///
    /// Owner-Only: removes the booking only when `user_id` matches the
    /// owner recorded at creation time. Returns false both for unknown ids
    /// and for ownership mismatches, so callers cannot probe for other
    /// users' booking ids.
    async fn cancel_booking(&self, id: Uuid, user_id: Uuid) -> bool {
        let mut bookings = self
            .bookings
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match bookings.get(&id) {
            Some(b) if b.user_id == user_id => {
                bookings.remove(&id);
                true
            }
            _ => false,
        }
    }

    async fn get_guide_tours(&self, guide_id: Uuid) -> Vec<Tour> {
        let tours = self
            .tours
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut result: Vec<Tour> = tours
            .values()
            .filter(|t| t.guide_id == Some(guide_id))
            .cloned()
            .collect();
        result.sort_by_key(|t| t.starts_at);
        result
    }

    async fn get_stats(&self) -> AdminDashboardStats {
        let tours = self
            .tours
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let bookings = self
            .bookings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        AdminDashboardStats {
            total_tours: tours.len() as i64,
            total_bookings: bookings.len() as i64,
            unpublished_tours: tours.values().filter(|t| !t.is_published).count() as i64,
        }
    }
}
