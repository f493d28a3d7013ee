//! Session controller.
//!
//! # Responsibility
//! - Resolve an existing session at startup and authenticate users.
//! - Apply identity-provider notifications at any time.
//! - Gate logout behind an explicit confirmation.
//!
//! # Invariants
//! - Transitions: `Unresolved -> {Authenticated, Anonymous}`,
//!   `Anonymous -> Authenticated`, `Authenticated -> Anonymous`. A token
//!   refresh replaces the session and stays `Authenticated`.
//! - Startup resolution never surfaces an error.
//! - The provider subscription lives exactly as long as the controller.

use crate::auth::login_email::derive_login_email;
use crate::auth::notify::SessionSubscription;
use crate::auth::provider::{IdentityProvider, SessionChange, SignInError};
use crate::logging::redact_email;
use crate::model::identity::{Credentials, Session};
use crate::repo::goal_repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};

/// Prompt shown before logging out.
pub const LOGOUT_PROMPT: &str = "Deseja realmente sair?";
const AUTH_FALLBACK_MESSAGE: &str = "Erro na autenticação";
pub const USERNAME_REQUIRED_MESSAGE: &str = "Informe o nome de usuário";
pub const PASSWORD_REQUIRED_MESSAGE: &str = "Informe a senha";

/// Session lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unresolved,
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Authentication failure shown on the auth screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Input rejected before contacting the provider.
    Validation(&'static str),
    /// Provider failure with a human-readable message.
    Remote(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::Remote(message) => write!(f, "{message}"),
        }
    }
}

impl Error for AuthError {}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        let message = value.message.trim();
        if message.is_empty() {
            Self::Remote(AUTH_FALLBACK_MESSAGE.to_string())
        } else {
            Self::Remote(message.to_string())
        }
    }
}

/// Result of a logout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// Confirmation declined; nothing changed.
    Cancelled,
    /// There was no session to end.
    NotSignedIn,
    SignedOut,
}

/// Holds the active session and drives its state machine.
pub struct SessionController {
    identity: Arc<dyn IdentityProvider>,
    state: Arc<Mutex<SessionState>>,
    _subscription: SessionSubscription,
}

impl SessionController {
    /// Creates an unresolved controller subscribed to `identity`.
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        let state = Arc::new(Mutex::new(SessionState::Unresolved));
        let weak_state = Arc::downgrade(&state);
        let subscription = identity.subscribe(Arc::new(move |change: &SessionChange| {
            if let Some(state) = weak_state.upgrade() {
                apply_change(&mut lock(&state), change);
            }
        }));
        Self {
            identity,
            state,
            _subscription: subscription,
        }
    }

    pub fn state(&self) -> SessionState {
        lock(&self.state).clone()
    }

    pub fn active_session(&self) -> Option<Session> {
        lock(&self.state).session().cloned()
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(*lock(&self.state), SessionState::Unresolved)
    }

    /// Asks the provider for a current session.
    ///
    /// Any provider error is logged and treated as "no session".
    pub fn resolve_existing_session(&self) -> Option<Session> {
        let resolved = match self.identity.current_session() {
            Ok(session) => session,
            Err(err) => {
                warn!(
                    "event=session_resolve module=session status=error kind={}",
                    err.kind.as_str()
                );
                None
            }
        };

        let mut state = lock(&self.state);
        match resolved {
            Some(session) => {
                info!("event=session_resolve module=session status=ok found=true");
                *state = SessionState::Authenticated(session);
            }
            None => {
                info!("event=session_resolve module=session status=ok found=false");
                if matches!(*state, SessionState::Unresolved) {
                    *state = SessionState::Anonymous;
                }
            }
        }
        state.session().cloned()
    }

    /// Signs in with `username`, creating the account when it does not exist.
    ///
    /// The sign-up display name is `username` exactly as typed.
    ///
    /// # Errors
    /// - `Validation` for blank username or empty password.
    /// - `Remote` for sign-in failures other than invalid credentials, and
    ///   for any sign-up failure.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::Validation(USERNAME_REQUIRED_MESSAGE));
        }
        if password.is_empty() {
            return Err(AuthError::Validation(PASSWORD_REQUIRED_MESSAGE));
        }

        let credentials = Credentials {
            email: derive_login_email(username),
            password: password.to_string(),
        };
        let redacted = redact_email(&credentials.email);

        let session = match self.identity.sign_in(&credentials) {
            Ok(session) => {
                info!("event=auth_sign_in module=session status=ok email={redacted}");
                session
            }
            Err(SignInError::InvalidCredentials(_)) => {
                info!("event=auth_sign_in module=session status=fallback_sign_up email={redacted}");
                let session = self
                    .identity
                    .sign_up(&credentials, username)
                    .map_err(|err| {
                        warn!(
                            "event=auth_sign_up module=session status=error kind={}",
                            err.kind.as_str()
                        );
                        AuthError::from(err)
                    })?;
                info!("event=auth_sign_up module=session status=ok email={redacted}");
                session
            }
            Err(SignInError::Remote(err)) => {
                warn!(
                    "event=auth_sign_in module=session status=error kind={}",
                    err.kind.as_str()
                );
                return Err(err.into());
            }
        };

        *lock(&self.state) = SessionState::Authenticated(session.clone());
        Ok(session)
    }

    /// Ends the active session after `confirm(LOGOUT_PROMPT)` returns true.
    ///
    /// A failed remote sign-out is logged; the local session ends anyway.
    pub fn logout(&self, confirm: impl FnOnce(&str) -> bool) -> LogoutOutcome {
        let Some(session) = self.active_session() else {
            return LogoutOutcome::NotSignedIn;
        };
        if !confirm(LOGOUT_PROMPT) {
            return LogoutOutcome::Cancelled;
        }

        if let Err(err) = self.identity.sign_out(&session) {
            warn!(
                "event=auth_sign_out module=session status=error kind={}",
                err.kind.as_str()
            );
        }
        *lock(&self.state) = SessionState::Anonymous;
        info!("event=auth_sign_out module=session status=ok");
        LogoutOutcome::SignedOut
    }
}

fn apply_change(state: &mut SessionState, change: &SessionChange) {
    match change {
        SessionChange::SignedIn(session) | SessionChange::TokenRefreshed(session) => {
            *state = SessionState::Authenticated(session.clone());
        }
        SessionChange::SignedOut => {
            *state = SessionState::Anonymous;
        }
    }
}

fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
