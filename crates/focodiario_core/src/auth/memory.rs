//! In-memory identity provider.
//!
//! # Responsibility
//! - Keep accounts and one current session in process.
//! - Publish the same notifications a hosted provider would.
//! - Allow tests to inject failures and external session changes.

use crate::auth::notify::{SessionListener, SessionNotifier, SessionSubscription};
use crate::auth::provider::{IdentityProvider, SessionChange, SignInError};
use crate::model::identity::{Credentials, Identity, Session};
use crate::repo::goal_repo::{RemoteErrorKind, RepoError, RepoResult};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Account {
    identity: Identity,
    password: String,
}

#[derive(Debug, Default)]
struct ProviderState {
    accounts: BTreeMap<String, Account>,
    current: Option<Session>,
    sign_in_failures: VecDeque<SignInError>,
    sign_up_failures: VecDeque<RepoError>,
    sign_out_failures: VecDeque<RepoError>,
    current_session_failures: VecDeque<RepoError>,
    sign_in_attempts: Vec<String>,
    sign_up_attempts: Vec<(String, String)>,
}

/// Process-local identity provider.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    state: Mutex<ProviderState>,
    notifier: SessionNotifier,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account without signing in.
    pub fn register_account(&self, email: &str, password: &str, display_name: Option<&str>) {
        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            display_name: display_name.map(str::to_string),
        };
        self.lock().accounts.insert(
            email.to_string(),
            Account {
                identity,
                password: password.to_string(),
            },
        );
    }

    /// Makes a signed-in session current without notifying, as if restored
    /// by the provider at startup.
    pub fn restore_session(&self, email: &str) -> Option<Session> {
        let mut state = self.lock();
        let session = state.accounts.get(email).map(|account| issue(&account.identity))?;
        state.current = Some(session.clone());
        Some(session)
    }

    pub fn fail_next_sign_in(&self, error: SignInError) {
        self.lock().sign_in_failures.push_back(error);
    }

    pub fn fail_next_sign_up(&self, error: RepoError) {
        self.lock().sign_up_failures.push_back(error);
    }

    pub fn fail_next_sign_out(&self, error: RepoError) {
        self.lock().sign_out_failures.push_back(error);
    }

    pub fn fail_next_current_session(&self, error: RepoError) {
        self.lock().current_session_failures.push_back(error);
    }

    /// Emails passed to `sign_in`, in call order.
    pub fn sign_in_attempts(&self) -> Vec<String> {
        self.lock().sign_in_attempts.clone()
    }

    /// `(email, display_name)` pairs passed to `sign_up`, in call order.
    pub fn sign_up_attempts(&self) -> Vec<(String, String)> {
        self.lock().sign_up_attempts.clone()
    }

    /// Simulates the provider invalidating the session on its own.
    pub fn expire_session(&self) {
        self.lock().current = None;
        self.notifier.publish(&SessionChange::SignedOut);
    }

    /// Simulates a token refresh for the current session.
    pub fn refresh_session(&self) -> Option<Session> {
        let refreshed = {
            let mut state = self.lock();
            let identity = state.current.as_ref()?.identity.clone();
            let session = issue(&identity);
            state.current = Some(session.clone());
            session
        };
        self.notifier
            .publish(&SessionChange::TokenRefreshed(refreshed.clone()));
        Some(refreshed)
    }

    pub fn listener_count(&self) -> usize {
        self.notifier.listener_count()
    }

    fn lock(&self) -> MutexGuard<'_, ProviderState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn activate(&self, session: Session) -> Session {
        self.lock().current = Some(session.clone());
        self.notifier
            .publish(&SessionChange::SignedIn(session.clone()));
        session
    }
}

impl IdentityProvider for MemoryIdentityProvider {
    fn current_session(&self) -> RepoResult<Option<Session>> {
        let mut state = self.lock();
        if let Some(error) = state.current_session_failures.pop_front() {
            return Err(error);
        }
        Ok(state.current.clone())
    }

    fn sign_in(&self, credentials: &Credentials) -> Result<Session, SignInError> {
        let session = {
            let mut state = self.lock();
            state.sign_in_attempts.push(credentials.email.clone());
            if let Some(error) = state.sign_in_failures.pop_front() {
                return Err(error);
            }
            match state.accounts.get(&credentials.email) {
                Some(account) if account.password == credentials.password => {
                    issue(&account.identity)
                }
                _ => {
                    return Err(SignInError::InvalidCredentials(
                        "Invalid login credentials".to_string(),
                    ))
                }
            }
        };
        Ok(self.activate(session))
    }

    fn sign_up(&self, credentials: &Credentials, display_name: &str) -> RepoResult<Session> {
        let session = {
            let mut state = self.lock();
            state
                .sign_up_attempts
                .push((credentials.email.clone(), display_name.to_string()));
            if let Some(error) = state.sign_up_failures.pop_front() {
                return Err(error);
            }
            if state.accounts.contains_key(&credentials.email) {
                return Err(RepoError::new(
                    RemoteErrorKind::Rejected,
                    "User already registered",
                ));
            }
            let identity = Identity {
                id: Uuid::new_v4().to_string(),
                email: credentials.email.clone(),
                display_name: Some(display_name.to_string()),
            };
            state.accounts.insert(
                credentials.email.clone(),
                Account {
                    identity: identity.clone(),
                    password: credentials.password.clone(),
                },
            );
            issue(&identity)
        };
        Ok(self.activate(session))
    }

    fn sign_out(&self, _session: &Session) -> RepoResult<()> {
        let result = {
            let mut state = self.lock();
            state.current = None;
            state.sign_out_failures.pop_front().map_or(Ok(()), Err)
        };
        // The local session ends even when the injected revoke fails.
        self.notifier.publish(&SessionChange::SignedOut);
        result
    }

    fn subscribe(&self, listener: SessionListener) -> SessionSubscription {
        self.notifier.subscribe(listener)
    }
}

fn issue(identity: &Identity) -> Session {
    Session {
        identity: identity.clone(),
        access_token: format!("mem-{}", Uuid::new_v4()),
        refresh_token: Some(format!("mem-refresh-{}", Uuid::new_v4())),
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryIdentityProvider;
    use crate::auth::provider::{IdentityProvider, SessionChange, SignInError};
    use crate::model::identity::Credentials;
    use crate::repo::goal_repo::{RemoteErrorKind, RepoError};
    use std::sync::{Arc, Mutex};

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn unknown_account_is_invalid_credentials() {
        let provider = MemoryIdentityProvider::new();
        let err = provider
            .sign_in(&credentials("ana@focodiario.com", "x"))
            .unwrap_err();
        assert!(matches!(err, SignInError::InvalidCredentials(_)));
    }

    #[test]
    fn sign_up_then_sign_in_reuses_identity() {
        let provider = MemoryIdentityProvider::new();
        let created = provider
            .sign_up(&credentials("ana@focodiario.com", "x"), "ana")
            .unwrap();
        let signed_in = provider
            .sign_in(&credentials("ana@focodiario.com", "x"))
            .unwrap();
        assert_eq!(created.identity, signed_in.identity);
        assert_ne!(created.access_token, signed_in.access_token);
    }

    #[test]
    fn failed_sign_out_still_publishes_signed_out() {
        let provider = MemoryIdentityProvider::new();
        let session = provider
            .sign_up(&credentials("ana@focodiario.com", "x"), "ana")
            .unwrap();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let _subscription = provider.subscribe(Arc::new(move |change: &SessionChange| {
            sink.lock().unwrap().push(change.clone());
        }));
        provider.fail_next_sign_out(RepoError::new(RemoteErrorKind::Network, "offline"));

        assert!(provider.sign_out(&session).is_err());
        assert_eq!(provider.current_session().unwrap(), None);
        assert_eq!(*events.lock().unwrap(), vec![SessionChange::SignedOut]);
    }

    #[test]
    fn wrong_password_is_invalid_credentials() {
        let provider = MemoryIdentityProvider::new();
        provider.register_account("ana@focodiario.com", "right", None);
        let err = provider
            .sign_in(&credentials("ana@focodiario.com", "wrong"))
            .unwrap_err();
        assert!(matches!(err, SignInError::InvalidCredentials(_)));
    }
}
