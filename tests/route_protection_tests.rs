use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::net::TcpListener;
use tour_portal::{
    AppState,
    config::AppConfig,
    create_router,
    models::{Booking, Tour},
    repository::{InMemoryRepository, RepositoryState},
    session::{Role, SessionStore},
};
use uuid::Uuid;

// --- Test Harness ---

pub struct TestApp {
    pub address: String,
    pub repo: Arc<InMemoryRepository>,
}

/// Spawns a fresh application instance on an ephemeral port. Each test gets
/// its own session store, so logins in one test cannot leak into another.
async fn spawn_app() -> TestApp {
    let repo = Arc::new(InMemoryRepository::new());

    let state = AppState {
        session: Arc::new(SessionStore::new()),
        repo: repo.clone() as RepositoryState,
        config: AppConfig::default(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address, repo }
}

/// A client that does NOT follow redirects, so the guard's 303 responses and
/// their Location targets can be asserted directly.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn make_tour(title: &str, published: bool, guide_id: Option<Uuid>) -> Tour {
    Tour {
        id: Uuid::new_v4(),
        title: title.to_string(),
        destination: "Kyoto".to_string(),
        description: "Temples and tea houses.".to_string(),
        price_cents: 9_900,
        capacity: 10,
        guide_id,
        is_published: published,
        starts_at: Utc::now() + Duration::days(10),
    }
}

async fn login_as(app: &TestApp, client: &reqwest::Client, role: Role) -> Uuid {
    let user_id = Uuid::new_v4();
    let resp = client
        .post(format!("{}/session", app.address))
        .json(&serde_json::json!({
            "id": user_id,
            "email": "t@example.com",
            "role": role.to_string(),
        }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), 200);
    user_id
}

fn location(resp: &reqwest::Response) -> &str {
    resp.headers()
        .get("location")
        .expect("redirect without Location header")
        .to_str()
        .unwrap()
}

// --- Public Surface ---

#[tokio::test]
async fn health_check_is_unguarded() {
    let app = spawn_app().await;
    let resp = client()
        .get(format!("{}/health", app.address))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
}

#[tokio::test]
async fn public_listing_hides_unpublished_tours() {
    let app = spawn_app().await;
    app.repo.insert_tour(make_tour("Visible", true, None));
    let hidden = make_tour("Hidden", false, None);
    app.repo.insert_tour(hidden.clone());

    let resp = client()
        .get(format!("{}/tours", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let tours: Vec<Tour> = resp.json().await.unwrap();

    assert_eq!(tours.len(), 1);
    assert!(tours.iter().all(|t| t.id != hidden.id));
}

// --- Guard: anonymous sessions ---

#[tokio::test]
async fn anonymous_request_to_guarded_route_redirects_to_login() {
    let app = spawn_app().await;
    let client = client();

    for path in ["/me", "/me/bookings", "/guide/itinerary", "/admin/stats"] {
        let resp = client
            .get(format!("{}{}", app.address, path))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 303, "{path} should redirect anonymously");
        assert_eq!(location(&resp), "/login", "{path} redirect target");
    }
}

#[tokio::test]
async fn login_redirect_discards_original_destination() {
    let app = spawn_app().await;
    let resp = client()
        .get(format!("{}/admin/stats?tab=overview", app.address))
        .send()
        .await
        .unwrap();

    // Fixed entry path, no return-to deep link.
    assert_eq!(location(&resp), "/login");
}

// --- Guard: authenticated sessions ---

#[tokio::test]
async fn wrong_role_redirects_to_unauthorized() {
    let app = spawn_app().await;
    let client = client();
    login_as(&app, &client, Role::Guide).await;

    let resp = client
        .get(format!("{}/admin/stats", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/unauthorized");
}

#[tokio::test]
async fn matching_role_reaches_the_handler() {
    let app = spawn_app().await;
    let client = client();
    login_as(&app, &client, Role::Tourist).await;

    let resp = client
        .get(format!("{}/me/bookings", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let bookings: Vec<Booking> = resp.json().await.unwrap();
    assert!(bookings.is_empty());
}

#[tokio::test]
async fn any_role_can_read_its_own_profile() {
    let app = spawn_app().await;
    let client = client();

    for role in [Role::Admin, Role::Guide, Role::Tourist] {
        login_as(&app, &client, role).await;
        let resp = client
            .get(format!("{}/me", app.address))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200, "profile for {role}");
    }
}

#[tokio::test]
async fn relogin_switches_effective_role_immediately() {
    let app = spawn_app().await;
    let client = client();

    login_as(&app, &client, Role::Tourist).await;
    let resp = client
        .get(format!("{}/admin/stats", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), "/unauthorized");

    // Account switch: a second login overwrites the first wholesale.
    login_as(&app, &client, Role::Admin).await;
    let resp = client
        .get(format!("{}/admin/stats", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn logout_makes_the_next_request_redirect_again() {
    let app = spawn_app().await;
    let client = client();
    login_as(&app, &client, Role::Tourist).await;

    let resp = client
        .delete(format!("{}/session", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let resp = client
        .get(format!("{}/me/bookings", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/login");
}

// --- End-to-End Flows ---

#[tokio::test]
async fn tourist_booking_lifecycle() {
    let app = spawn_app().await;
    let client = client();
    let tour = make_tour("Bookable", true, None);
    app.repo.insert_tour(tour.clone());

    let user_id = login_as(&app, &client, Role::Tourist).await;

    // Book
    let resp = client
        .post(format!("{}/bookings", app.address))
        .json(&serde_json::json!({ "tour_id": tour.id, "seats": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let booking: Booking = resp.json().await.unwrap();
    assert_eq!(booking.user_id, user_id);

    // Listed under /me/bookings
    let resp = client
        .get(format!("{}/me/bookings", app.address))
        .send()
        .await
        .unwrap();
    let bookings: Vec<Booking> = resp.json().await.unwrap();
    assert_eq!(bookings.len(), 1);

    // Cancel
    let resp = client
        .delete(format!("{}/bookings/{}", app.address, booking.id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);
}

#[tokio::test]
async fn admin_publishing_makes_a_tour_publicly_visible() {
    let app = spawn_app().await;
    let client = client();
    let tour = make_tour("Pending", false, None);
    app.repo.insert_tour(tour.clone());

    // 1. Not in the public list while unpublished.
    let resp = client
        .get(format!("{}/tours", app.address))
        .send()
        .await
        .unwrap();
    let listed: Vec<Tour> = resp.json().await.unwrap();
    assert!(listed.iter().all(|t| t.id != tour.id));

    // 2. Admin publishes it.
    login_as(&app, &client, Role::Admin).await;
    let resp = client
        .put(format!("{}/admin/tours/{}/status", app.address, tour.id))
        .json(&true)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Tour = resp.json().await.unwrap();
    assert!(updated.is_published);

    // 3. Now publicly visible.
    let resp = client
        .get(format!("{}/tours", app.address))
        .send()
        .await
        .unwrap();
    let listed: Vec<Tour> = resp.json().await.unwrap();
    assert!(listed.iter().any(|t| t.id == tour.id));
}

#[tokio::test]
async fn guide_itinerary_includes_unpublished_assignments() {
    let app = spawn_app().await;
    let client = client();
    let guide_id = login_as(&app, &client, Role::Guide).await;

    app.repo
        .insert_tour(make_tour("Assigned draft", false, Some(guide_id)));
    app.repo.insert_tour(make_tour("Someone else's", true, Some(Uuid::new_v4())));

    let resp = client
        .get(format!("{}/guide/itinerary", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let tours: Vec<Tour> = resp.json().await.unwrap();
    assert_eq!(tours.len(), 1);
    assert_eq!(tours[0].title, "Assigned draft");
}

#[tokio::test]
async fn login_rejects_unknown_role_strings() {
    let app = spawn_app().await;
    let resp = client()
        .post(format!("{}/session", app.address))
        .json(&serde_json::json!({
            "id": Uuid::new_v4(),
            "email": "x@example.com",
            "role": "superuser",
        }))
        .send()
        .await
        .unwrap();

    // The closed Role enum rejects the payload before the store is touched.
    assert_eq!(resp.status(), 422);

    // And the session is still anonymous.
    let resp = client()
        .get(format!("{}/me", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 303);
}
