use std::env;
use std::str::FromStr;

use crate::session::Role;

/// AppConfig
///
/// Holds the application's entire configuration state. Immutable once loaded,
/// so every route evaluation sees the same login/unauthorized paths for the
/// lifetime of the process. Pulled into handlers and middleware through the
/// shared application state.
#[derive(Clone)]
pub struct AppConfig {
    /// Runtime environment marker. Controls log format and whether the
    /// development session seed is honoured.
    pub env: Env,
    /// Fixed path the guard redirects to when the session is anonymous.
    pub login_path: String,
    /// Fixed path the guard redirects to when the role is not permitted.
    pub unauthorized_path: String,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Env::Local only: seed the session store with a synthetic user of this
    /// role at startup, replicating a pre-authenticated development session
    /// without ever shipping that behaviour to production.
    pub dev_session_role: Option<Role>,
}

/// Env
///
/// Distinguishes development conveniences (pretty logs, session seeding) from
/// production behaviour (JSON logs, mandatory anonymous startup).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// A safe, non-panicking AppConfig used for test setup, so unit and
    /// integration tests can build application state without touching
    /// environment variables.
    fn default() -> Self {
        Self {
            env: Env::Local,
            login_path: "/login".to_string(),
            unauthorized_path: "/unauthorized".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            dev_session_role: None,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical startup initializer. Reads all parameters from
    /// environment variables and implements the fail-fast principle: a value
    /// that would silently weaken the guard (an unparseable role seed, or a
    /// role seed present in production) aborts startup instead of being
    /// ignored.
    ///
    /// # Panics
    /// Panics if `DEV_SESSION_ROLE` is set to an unrecognised role, or if it
    /// is set at all while `APP_ENV=production`.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let login_path = env::var("LOGIN_PATH").unwrap_or_else(|_| "/login".to_string());
        let unauthorized_path =
            env::var("UNAUTHORIZED_PATH").unwrap_or_else(|_| "/unauthorized".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        // Development session seed resolution. A pre-authenticated session is
        // only honoured locally; in production a stray DEV_SESSION_ROLE is a
        // deployment mistake and must abort.
        let dev_session_role = match env::var("DEV_SESSION_ROLE") {
            Ok(raw) => {
                if env == Env::Production {
                    panic!("FATAL: DEV_SESSION_ROLE must not be set in production.");
                }
                let role = Role::from_str(&raw)
                    .unwrap_or_else(|e| panic!("FATAL: invalid DEV_SESSION_ROLE: {e}"));
                Some(role)
            }
            Err(_) => None,
        };

        Self {
            env,
            login_path,
            unauthorized_path,
            bind_addr,
            dev_session_role,
        }
    }
}
