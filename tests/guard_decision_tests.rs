use tour_portal::guard::{Decision, evaluate};
use tour_portal::session::{Role, Session, SessionUser};
use uuid::Uuid;

// --- Helpers ---

fn user_with_role(role: Role) -> SessionUser {
    SessionUser {
        id: Uuid::from_u128(1),
        email: "test@example.com".to_string(),
        role,
    }
}

fn authenticated(role: Role) -> Session {
    Session::authenticated(user_with_role(role))
}

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Guide, Role::Tourist];

// --- Anonymous sessions ---

#[test]
fn anonymous_always_redirects_to_login() {
    let session = Session::anonymous();

    // Regardless of the allowed set: empty, partial, or universal.
    assert_eq!(evaluate(&session, &[]), Decision::RedirectLogin);
    assert_eq!(evaluate(&session, &[Role::Admin]), Decision::RedirectLogin);
    assert_eq!(evaluate(&session, ALL_ROLES), Decision::RedirectLogin);
}

#[test]
fn anonymous_admin_route_redirects_to_login() {
    // Scenario A: {isAuthenticated:false, user:null}, allowed={admin}.
    let session = Session {
        is_authenticated: false,
        user: None,
    };
    assert_eq!(evaluate(&session, &[Role::Admin]), Decision::RedirectLogin);
}

// --- Authenticated sessions ---

#[test]
fn wrong_role_redirects_to_unauthorized() {
    // Scenario B: guide hitting an admin-only route.
    let session = authenticated(Role::Guide);
    assert_eq!(
        evaluate(&session, &[Role::Admin]),
        Decision::RedirectUnauthorized
    );
}

#[test]
fn member_role_is_allowed() {
    // Scenario C: tourist hitting a {tourist, guide} route.
    let session = authenticated(Role::Tourist);
    assert_eq!(
        evaluate(&session, &[Role::Tourist, Role::Guide]),
        Decision::Allow
    );
}

#[test]
fn allow_iff_role_is_in_allowed_set() {
    // Exhaustive matrix over the closed role set.
    for &session_role in ALL_ROLES {
        let session = authenticated(session_role);
        for &route_role in ALL_ROLES {
            let expected = if session_role == route_role {
                Decision::Allow
            } else {
                Decision::RedirectUnauthorized
            };
            assert_eq!(
                evaluate(&session, &[route_role]),
                expected,
                "session role {session_role} against route allowing {route_role}"
            );
        }
        // Universal set always allows an authenticated session.
        assert_eq!(evaluate(&session, ALL_ROLES), Decision::Allow);
    }
}

#[test]
fn empty_allowed_set_never_allows() {
    for &role in ALL_ROLES {
        let session = authenticated(role);
        assert_eq!(evaluate(&session, &[]), Decision::RedirectUnauthorized);
    }
}

// --- Defensive cases ---

#[test]
fn malformed_session_fails_closed_to_login() {
    // Authenticated flag set but no user attached: treat as anonymous
    // rather than dereferencing a role that is not there.
    let session = Session {
        is_authenticated: true,
        user: None,
    };
    assert_eq!(evaluate(&session, ALL_ROLES), Decision::RedirectLogin);
    assert_eq!(evaluate(&session, &[]), Decision::RedirectLogin);
}

#[test]
fn evaluation_is_pure_and_repeatable() {
    // Same inputs, same decision: no memoization or hidden state.
    let session = authenticated(Role::Admin);
    for _ in 0..3 {
        assert_eq!(evaluate(&session, &[Role::Admin]), Decision::Allow);
    }
}
