//! Core logic for FocoDiário, a personal goal tracker.
//! This crate owns session state, the local goal cache and the view models;
//! persistence and identity live in a hosted backend.

pub mod app;
pub mod auth;
pub mod config;
pub mod logging;
pub mod model;
pub mod remote;
pub mod repo;
pub mod service;
pub mod view;

pub use app::{App, MainScreen, Screen, TabContent};
pub use auth::login_email::{derive_login_email, LOGIN_EMAIL_DOMAIN};
pub use auth::memory::MemoryIdentityProvider;
pub use auth::notify::{SessionListener, SessionNotifier, SessionSubscription};
pub use auth::provider::{IdentityProvider, SessionChange, SignInError};
pub use config::{ConfigError, RemoteConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, UnknownCategory};
pub use model::goal::{Goal, GoalId, NewGoal};
pub use model::identity::{Credentials, Identity, Session};
pub use remote::supabase::SupabaseClient;
pub use repo::goal_repo::{GoalRepository, RemoteErrorKind, RepoError, RepoResult};
pub use repo::memory_repo::{MemoryGoalRepository, RepoOp};
pub use service::goal_cache::{CacheError, CacheResult, GoalCache};
pub use service::session_controller::{
    AuthError, LogoutOutcome, SessionController, SessionState, LOGOUT_PROMPT,
    PASSWORD_REQUIRED_MESSAGE, USERNAME_REQUIRED_MESSAGE,
};
pub use view::Tab;

/// Minimal health-check API for shell integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
