use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    session::{Role, Session},
};

/// Decision
///
/// The three possible outcomes of guarding a single navigation. Exactly one
/// is produced for every input; the guard has no error channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The session may see the requested subtree; run the inner handler.
    Allow,
    /// No identity is attached to the session; send the client to the login
    /// entry point. The original destination is discarded.
    RedirectLogin,
    /// The session is authenticated but its role is not in the route's
    /// allowed set; send the client to the unauthorized notice.
    RedirectUnauthorized,
}

/// evaluate
///
/// The core decision function: maps a session snapshot plus a route's
/// allowed-role declaration to a `Decision`. Pure and total — it never
/// panics, performs no I/O, and is re-run on every request so a login,
/// logout, or role change is reflected by the very next navigation.
///
/// The two predicates are checked in a fixed order:
/// 1. Authentication. An anonymous session redirects to login before the
///    role is ever inspected (there is no role to inspect). A session whose
///    authenticated flag is set but whose user is missing is malformed and
///    fails closed the same way.
/// 2. Authorization. An authenticated role outside `allowed_roles` redirects
///    to the unauthorized page. An empty `allowed_roles` therefore denies
///    every role — it can never grant access by accident.
pub fn evaluate(session: &Session, allowed_roles: &[Role]) -> Decision {
    if !session.is_authenticated {
        return Decision::RedirectLogin;
    }

    let Some(user) = &session.user else {
        // Malformed session: treat as anonymous rather than guessing at a
        // role. Least privilege wins.
        return Decision::RedirectLogin;
    };

    if allowed_roles.contains(&user.role) {
        Decision::Allow
    } else {
        Decision::RedirectUnauthorized
    }
}

/// enforce
///
/// The navigation collaborator around `evaluate`: middleware body applied to
/// each protected route group via `middleware::from_fn_with_state`. It reads
/// one consistent session snapshot, evaluates it against the group's
/// allowed-role declaration, and either runs the inner handler or issues a
/// 303 redirect to the fixed login/unauthorized path from the configuration.
pub async fn enforce(
    state: AppState,
    allowed_roles: &'static [Role],
    request: Request,
    next: Next,
) -> Response {
    let session = state.session.snapshot();

    match evaluate(&session, allowed_roles) {
        Decision::Allow => next.run(request).await,
        Decision::RedirectLogin => {
            tracing::debug!(path = %request.uri().path(), "anonymous session, redirecting to login");
            Redirect::to(&state.config.login_path).into_response()
        }
        Decision::RedirectUnauthorized => {
            tracing::debug!(
                path = %request.uri().path(),
                role = ?session.user.as_ref().map(|u| u.role),
                "role not permitted, redirecting to unauthorized notice"
            );
            Redirect::to(&state.config.unauthorized_path).into_response()
        }
    }
}
