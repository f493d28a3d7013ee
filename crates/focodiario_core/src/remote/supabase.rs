//! Blocking HTTP client for the hosted backend.
//!
//! # Responsibility
//! - Map goal CRUD onto the REST data API (`/rest/v1/goals`).
//! - Map sign-in/sign-up/sign-out/session lookup onto the auth API.
//! - Hold the provider-side session in memory and publish changes.
//!
//! # Invariants
//! - Sign-in failures with HTTP 400 or an "Invalid login credentials"
//!   message are classified as invalid credentials.
//! - A sign-up response without an access token is an error.
//! - No request is retried.

use crate::auth::notify::{SessionListener, SessionNotifier, SessionSubscription};
use crate::auth::provider::{IdentityProvider, SessionChange, SignInError};
use crate::config::RemoteConfig;
use crate::model::goal::{Goal, GoalId, NewGoal};
use crate::model::identity::{Credentials, Session};
use crate::remote::rows::{
    CompletedPatch, ErrorBody, GoalRow, InsertGoalRow, PasswordGrant, RefreshGrant, SignUpBody,
    SignUpMetadata, TokenResponse, UserRow,
};
use crate::repo::goal_repo::{GoalRepository, RemoteErrorKind, RepoError, RepoResult};
use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const GOALS_TABLE: &str = "goals";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid login credentials";

/// Backend client implementing both remote contracts.
pub struct SupabaseClient {
    config: RemoteConfig,
    http: Client,
    current: Mutex<Option<Session>>,
    notifier: SessionNotifier,
}

impl SupabaseClient {
    /// Builds a client for `config`.
    ///
    /// # Errors
    /// - Returns `Unavailable` when the TLS/HTTP stack cannot be initialized.
    pub fn new(config: RemoteConfig) -> RepoResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| RepoError::new(RemoteErrorKind::Unavailable, err.to_string()))?;
        Ok(Self {
            config,
            http,
            current: Mutex::new(None),
            notifier: SessionNotifier::new(),
        })
    }

    fn rest_url(&self) -> String {
        format!("{}/rest/v1/{GOALS_TABLE}", self.config.endpoint())
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.endpoint())
    }

    fn with_key(&self, builder: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        builder
            .header("apikey", self.config.api_key())
            .bearer_auth(bearer.unwrap_or(self.config.api_key()))
    }

    fn current(&self) -> MutexGuard<'_, Option<Session>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_current(&self, session: Option<Session>) {
        *self.current() = session;
    }

    fn fetch_user(&self, access_token: &str) -> RepoResult<UserRow> {
        let request = self.with_key(self.http.get(self.auth_url("user")), Some(access_token));
        decode(send(request)?)
    }

    fn refresh(&self, refresh_token: &str) -> RepoResult<Session> {
        let request = self
            .with_key(self.http.post(self.auth_url("token")), None)
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshGrant { refresh_token });
        let response: TokenResponse = decode(send(request)?)?;
        response.into_session().ok_or_else(|| {
            RepoError::new(
                RemoteErrorKind::InvalidData,
                "token refresh returned no session",
            )
        })
    }

    fn publish_signed_in(&self, session: Session) -> Session {
        self.set_current(Some(session.clone()));
        self.notifier
            .publish(&SessionChange::SignedIn(session.clone()));
        session
    }
}

impl GoalRepository for SupabaseClient {
    fn list_goals(&self, session: &Session) -> RepoResult<Vec<Goal>> {
        let request = self
            .with_key(self.http.get(self.rest_url()), Some(&session.access_token))
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let rows: Vec<GoalRow> = decode(send(request)?)?;
        rows.into_iter().map(GoalRow::into_goal).collect()
    }

    fn insert_goal(&self, session: &Session, goal: &NewGoal) -> RepoResult<Goal> {
        let body = [InsertGoalRow {
            title: &goal.title,
            category: goal.category,
            completed: false,
            user_id: session.owner_id(),
        }];
        let request = self
            .with_key(self.http.post(self.rest_url()), Some(&session.access_token))
            .header("Prefer", "return=representation")
            .json(&body);
        let rows: Vec<GoalRow> = decode(send(request)?)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| {
                RepoError::new(RemoteErrorKind::InvalidData, "insert returned no rows")
            })?
            .into_goal()
    }

    fn set_completed(&self, session: &Session, id: &GoalId, completed: bool) -> RepoResult<()> {
        let request = self
            .with_key(self.http.patch(self.rest_url()), Some(&session.access_token))
            .query(&[("id", id_filter(id))])
            .json(&CompletedPatch { completed });
        send(request).map(drop)
    }

    fn delete_goal(&self, session: &Session, id: &GoalId) -> RepoResult<()> {
        let request = self
            .with_key(self.http.delete(self.rest_url()), Some(&session.access_token))
            .query(&[("id", id_filter(id))]);
        send(request).map(drop)
    }
}

impl IdentityProvider for SupabaseClient {
    fn current_session(&self) -> RepoResult<Option<Session>> {
        let Some(held) = self.current().clone() else {
            return Ok(None);
        };

        match self.fetch_user(&held.access_token) {
            Ok(user) => {
                let session = Session {
                    identity: user.into_identity(),
                    ..held
                };
                self.set_current(Some(session.clone()));
                Ok(Some(session))
            }
            Err(err) if err.kind == RemoteErrorKind::Unauthorized => {
                let refreshed = held
                    .refresh_token
                    .as_deref()
                    .map(|token| self.refresh(token));
                match refreshed {
                    Some(Ok(session)) => {
                        debug!("event=session_refresh module=remote status=ok");
                        self.set_current(Some(session.clone()));
                        self.notifier
                            .publish(&SessionChange::TokenRefreshed(session.clone()));
                        Ok(Some(session))
                    }
                    other => {
                        if let Some(Err(refresh_err)) = other {
                            warn!(
                                "event=session_refresh module=remote status=error kind={}",
                                refresh_err.kind.as_str()
                            );
                        }
                        self.set_current(None);
                        self.notifier.publish(&SessionChange::SignedOut);
                        Ok(None)
                    }
                }
            }
            Err(err) => Err(err),
        }
    }

    fn sign_in(&self, credentials: &Credentials) -> Result<Session, SignInError> {
        let request = self
            .with_key(self.http.post(self.auth_url("token")), None)
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant {
                email: &credentials.email,
                password: &credentials.password,
            });
        let response = execute(request)?;
        let status = response.status();
        if !status.is_success() {
            let message = error_message(status, response);
            return Err(classify_sign_in_failure(status, message));
        }
        let session = decode::<TokenResponse>(response)?
            .into_session()
            .ok_or_else(|| {
                SignInError::Remote(RepoError::new(
                    RemoteErrorKind::InvalidData,
                    "sign-in returned no session",
                ))
            })?;
        Ok(self.publish_signed_in(session))
    }

    fn sign_up(&self, credentials: &Credentials, display_name: &str) -> RepoResult<Session> {
        let request = self
            .with_key(self.http.post(self.auth_url("signup")), None)
            .json(&SignUpBody {
                email: &credentials.email,
                password: &credentials.password,
                data: SignUpMetadata { display_name },
            });
        let session = decode::<TokenResponse>(send(request)?)?
            .into_session()
            .ok_or_else(|| {
                RepoError::new(
                    RemoteErrorKind::Rejected,
                    "account created but no session was issued; confirm the email first",
                )
            })?;
        Ok(self.publish_signed_in(session))
    }

    fn sign_out(&self, session: &Session) -> RepoResult<()> {
        let request = self.with_key(
            self.http.post(self.auth_url("logout")),
            Some(&session.access_token),
        );
        let result = send(request).map(drop);
        // The local session ends even when the remote revoke fails.
        self.set_current(None);
        self.notifier.publish(&SessionChange::SignedOut);
        result
    }

    fn subscribe(&self, listener: SessionListener) -> SessionSubscription {
        self.notifier.subscribe(listener)
    }
}

fn id_filter(id: &GoalId) -> String {
    format!("eq.{id}")
}

fn execute(request: RequestBuilder) -> RepoResult<Response> {
    request
        .send()
        .map_err(|err| RepoError::new(RemoteErrorKind::Network, err.to_string()))
}

fn send(request: RequestBuilder) -> RepoResult<Response> {
    let response = execute(request)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = error_message(status, response);
    Err(RepoError::new(kind_for_status(status), message))
}

fn decode<T: serde::de::DeserializeOwned>(response: Response) -> RepoResult<T> {
    response
        .json::<T>()
        .map_err(|err| RepoError::new(RemoteErrorKind::InvalidData, err.to_string()))
}

fn error_message(status: StatusCode, response: Response) -> String {
    let raw = response.text().unwrap_or_default();
    ErrorBody::parse(&raw)
        .into_message()
        .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()))
}

fn kind_for_status(status: StatusCode) -> RemoteErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteErrorKind::Unauthorized,
        StatusCode::NOT_FOUND => RemoteErrorKind::NotFound,
        status if status.is_server_error() => RemoteErrorKind::Unavailable,
        _ => RemoteErrorKind::Rejected,
    }
}

fn classify_sign_in_failure(status: StatusCode, message: String) -> SignInError {
    if status == StatusCode::BAD_REQUEST || message.contains(INVALID_CREDENTIALS_MESSAGE) {
        return SignInError::InvalidCredentials(message);
    }
    SignInError::Remote(RepoError::new(kind_for_status(status), message))
}
