//! Goal repository contract and shared remote error type.
//!
//! # Responsibility
//! - Describe read/create/update/delete over the `goals` collection.
//! - Classify remote failures into a small stable set of kinds.
//!
//! # Invariants
//! - `list_goals` returns rows ordered by creation time, newest first.
//! - `insert_goal` returns the stored row with server-assigned id/timestamp.

use crate::model::goal::{Goal, GoalId, NewGoal};
use crate::model::identity::Session;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Stable classification of remote failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Transport failed before a response arrived.
    Network,
    /// Session missing, expired or rejected.
    Unauthorized,
    /// Target row does not exist for this owner.
    NotFound,
    /// Response body did not match the expected shape.
    InvalidData,
    /// Request was understood and refused.
    Rejected,
    /// Backend reported a server-side failure.
    Unavailable,
}

impl RemoteErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::InvalidData => "invalid_data",
            Self::Rejected => "rejected",
            Self::Unavailable => "unavailable",
        }
    }
}

/// Error returned by remote data and identity calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RepoError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl Error for RepoError {}

/// Repository interface for the remote `goals` collection.
pub trait GoalRepository: Send + Sync {
    /// Selects every row owned by the session, newest first.
    fn list_goals(&self, session: &Session) -> RepoResult<Vec<Goal>>;
    /// Inserts one row with `completed = false` owned by the session.
    fn insert_goal(&self, session: &Session, goal: &NewGoal) -> RepoResult<Goal>;
    /// Patches `completed` on the row matching `id`.
    fn set_completed(&self, session: &Session, id: &GoalId, completed: bool) -> RepoResult<()>;
    /// Removes the row matching `id`.
    fn delete_goal(&self, session: &Session, id: &GoalId) -> RepoResult<()>;
}
