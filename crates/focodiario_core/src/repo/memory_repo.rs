//! In-memory goal repository.
//!
//! # Responsibility
//! - Mirror the remote store's owner scoping and ordering in process.
//! - Allow tests and demos to inject one-shot failures per operation.
//!
//! # Invariants
//! - Timestamps are strictly increasing across inserts.
//! - Rows are only visible to the owner id that created them.

use crate::model::goal::{Goal, GoalId, NewGoal};
use crate::model::identity::Session;
use crate::repo::goal_repo::{GoalRepository, RemoteErrorKind, RepoError, RepoResult};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Operation selector for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RepoOp {
    List,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone)]
struct StoredGoal {
    owner_id: String,
    goal: Goal,
}

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<StoredGoal>,
    clock_ms: i64,
    pending_failures: BTreeMap<RepoOp, RepoError>,
}

/// Process-local stand-in for the remote `goals` collection.
#[derive(Debug, Default)]
pub struct MemoryGoalRepository {
    state: Mutex<MemoryState>,
    list_calls: AtomicUsize,
    insert_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MemoryGoalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the insert clock at `epoch_ms`; each insert advances it by 1 s.
    pub fn with_clock(epoch_ms: i64) -> Self {
        let repo = Self::default();
        repo.lock().clock_ms = epoch_ms;
        repo
    }

    /// Makes the next call of `op` fail with `error`.
    pub fn fail_next(&self, op: RepoOp, error: RepoError) {
        self.lock().pending_failures.insert(op, error);
    }

    /// Number of calls received for `op`, failed ones included.
    pub fn calls(&self, op: RepoOp) -> usize {
        self.counter(op).load(Ordering::SeqCst)
    }

    /// Stores a row directly, bypassing the insert clock.
    pub fn seed(&self, owner_id: &str, goal: Goal) {
        self.lock().rows.push(StoredGoal {
            owner_id: owner_id.to_string(),
            goal,
        });
    }

    /// Rows currently stored for `owner_id`, newest first.
    pub fn rows_for(&self, owner_id: &str) -> Vec<Goal> {
        let state = self.lock();
        sorted_rows(&state, owner_id)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn counter(&self, op: RepoOp) -> &AtomicUsize {
        match op {
            RepoOp::List => &self.list_calls,
            RepoOp::Insert => &self.insert_calls,
            RepoOp::Update => &self.update_calls,
            RepoOp::Delete => &self.delete_calls,
        }
    }

    fn begin(&self, op: RepoOp) -> RepoResult<MutexGuard<'_, MemoryState>> {
        self.counter(op).fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        if let Some(error) = state.pending_failures.remove(&op) {
            return Err(error);
        }
        Ok(state)
    }
}

impl GoalRepository for MemoryGoalRepository {
    fn list_goals(&self, session: &Session) -> RepoResult<Vec<Goal>> {
        let state = self.begin(RepoOp::List)?;
        Ok(sorted_rows(&state, session.owner_id()))
    }

    fn insert_goal(&self, session: &Session, goal: &NewGoal) -> RepoResult<Goal> {
        let mut state = self.begin(RepoOp::Insert)?;
        state.clock_ms += 1_000;
        let stored = Goal {
            id: GoalId::new(Uuid::new_v4().to_string()),
            title: goal.title.clone(),
            category: goal.category,
            completed: false,
            created_at_ms: state.clock_ms,
        };
        state.rows.push(StoredGoal {
            owner_id: session.owner_id().to_string(),
            goal: stored.clone(),
        });
        Ok(stored)
    }

    fn set_completed(&self, session: &Session, id: &GoalId, completed: bool) -> RepoResult<()> {
        let mut state = self.begin(RepoOp::Update)?;
        let row = state
            .rows
            .iter_mut()
            .find(|row| row.owner_id == session.owner_id() && row.goal.id == *id)
            .ok_or_else(|| not_found(id))?;
        row.goal.completed = completed;
        Ok(())
    }

    fn delete_goal(&self, session: &Session, id: &GoalId) -> RepoResult<()> {
        let mut state = self.begin(RepoOp::Delete)?;
        let before = state.rows.len();
        state
            .rows
            .retain(|row| !(row.owner_id == session.owner_id() && row.goal.id == *id));
        if state.rows.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn sorted_rows(state: &MemoryState, owner_id: &str) -> Vec<Goal> {
    let mut rows = state
        .rows
        .iter()
        .filter(|row| row.owner_id == owner_id)
        .map(|row| row.goal.clone())
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
    rows
}

fn not_found(id: &GoalId) -> RepoError {
    RepoError::new(RemoteErrorKind::NotFound, format!("goal not found: {id}"))
}
