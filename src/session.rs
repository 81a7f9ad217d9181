use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

/// Role
///
/// The closed set of principal classes recognised by the portal. Route access
/// is decided purely on this value, so it is a tagged enum rather than a
/// free-form string: an unknown role is rejected at the serde boundary and can
/// never reach the route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    /// Full moderation and oversight access (tour publishing, stats).
    Admin,
    /// A tour guide: sees the itinerary of tours assigned to them.
    Guide,
    /// A regular customer: browses the catalog and manages their own bookings.
    Tourist,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Admin => "admin",
            Role::Guide => "guide",
            Role::Tourist => "tourist",
        };
        f.write_str(s)
    }
}

impl FromStr for Role {
    type Err = String;

    /// Parses the lowercase wire form. Used by the `DEV_SESSION_ROLE`
    /// configuration knob; the HTTP surface goes through serde instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "guide" => Ok(Role::Guide),
            "tourist" => Ok(Role::Tourist),
            other => Err(format!("unrecognised role '{other}'")),
        }
    }
}

/// SessionUser
///
/// The identity attached to an authenticated session. This is trusted input:
/// credential verification happens in the external identity provider before
/// `login` is ever called, so the struct carries no secrets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    /// The RBAC field consulted by the route guard.
    pub role: Role,
}

/// Session
///
/// A consistent snapshot of the authentication state at one instant.
///
/// Invariant (maintained by `SessionStore`, which only ever replaces the two
/// fields together): `is_authenticated == false ⟺ user == None`. The snapshot
/// is still a plain data struct, so hand-built values violating the invariant
/// are representable; the route guard treats those defensively (fail closed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Session {
    pub is_authenticated: bool,
    pub user: Option<SessionUser>,
}

impl Session {
    /// The logged-out state. This is the production default at startup; any
    /// pre-authenticated session must come from an explicit login (or the
    /// Env::Local development seed).
    pub fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            user: None,
        }
    }

    /// A session holding `user`. Sets both fields together.
    pub fn authenticated(user: SessionUser) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// SessionStore
///
/// The single source of truth for "who is logged in and with what role".
/// One mutable cell, mutated only through `login` and `logout`; every route
/// evaluation reads a whole-session snapshot, never the fields individually.
///
/// Both mutation entry points replace the entire `Session` value under one
/// write lock, so a reader can never observe `is_authenticated` updated but
/// `user` stale (no torn reads). Decisions derived from a snapshot are pure,
/// so the next navigation after a `login`/`logout` always sees the new state.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: RwLock<Session>,
}

/// Shared handle to the application-wide session store.
pub type SessionState = Arc<SessionStore>;

impl SessionStore {
    /// Creates a store in the anonymous state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with `session`. Used by the Env::Local
    /// development seed and by tests; production startup uses `new`.
    pub fn with_session(session: Session) -> Self {
        Self {
            current: RwLock::new(session),
        }
    }

    /// login
    ///
    /// Replaces any prior session with an authenticated one for `user`.
    /// No preconditions and no failure modes: logging in over an existing
    /// session overwrites it wholesale (account switch semantics), never
    /// merges the two identities.
    pub fn login(&self, user: SessionUser) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Session::authenticated(user);
    }

    /// logout
    ///
    /// Clears the session back to anonymous. Both fields are cleared in the
    /// same write, and calling this on an already-anonymous store is a no-op.
    pub fn logout(&self) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Session::anonymous();
    }

    /// snapshot
    ///
    /// Returns a consistent copy of the whole session. Callers evaluate
    /// against the copy, so a concurrent `login`/`logout` affects the next
    /// evaluation rather than tearing the current one.
    pub fn snapshot(&self) -> Session {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// CurrentUser Extractor
///
/// Resolves the identity of the active session for handlers that need one
/// (bookings, itinerary, profile). This is the second line of defence behind
/// the route-guard middleware: even if a handler is wired into the router
/// without a guard layer, an anonymous session is rejected with 401 here.
///
/// Rejection: StatusCode::UNAUTHORIZED when the session is anonymous or
/// malformed (authenticated flag set but no user attached).
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    SessionState: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionState::from_ref(state).snapshot();

        // The user field is authoritative: a set flag with no user is a
        // malformed session and is treated as anonymous.
        if !session.is_authenticated {
            return Err(StatusCode::UNAUTHORIZED);
        }
        match session.user {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(StatusCode::UNAUTHORIZED),
        }
    }
}
