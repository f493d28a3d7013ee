//! Identity provider contract.
//!
//! # Invariants
//! - `sign_in` distinguishes invalid credentials from every other failure.
//! - Providers publish `SessionChange` events to subscribers after their own
//!   session state is updated.

use crate::auth::notify::{SessionListener, SessionSubscription};
use crate::model::identity::{Credentials, Session};
use crate::repo::goal_repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Push notification emitted by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

/// Sign-in failure, split so callers can fall back to sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInError {
    /// Unknown account or wrong password.
    InvalidCredentials(String),
    /// Any other failure.
    Remote(RepoError),
}

impl Display for SignInError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials(message) => write!(f, "{message}"),
            Self::Remote(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SignInError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCredentials(_) => None,
            Self::Remote(err) => Some(err),
        }
    }
}

impl From<RepoError> for SignInError {
    fn from(value: RepoError) -> Self {
        Self::Remote(value)
    }
}

/// Remote identity collaborator.
pub trait IdentityProvider: Send + Sync {
    /// Returns the provider's currently valid session, if any.
    fn current_session(&self) -> RepoResult<Option<Session>>;
    fn sign_in(&self, credentials: &Credentials) -> Result<Session, SignInError>;
    /// Creates an account and signs into it, attaching `display_name`.
    fn sign_up(&self, credentials: &Credentials, display_name: &str) -> RepoResult<Session>;
    fn sign_out(&self, session: &Session) -> RepoResult<()>;
    /// Registers `listener`; dropping the returned handle unsubscribes.
    fn subscribe(&self, listener: SessionListener) -> SessionSubscription;
}
