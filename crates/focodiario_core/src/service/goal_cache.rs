//! Local goal cache.
//!
//! # Responsibility
//! - Mirror the remote `goals` collection for the active session.
//! - Apply create/toggle/delete only after the remote store confirms them.
//!
//! # Invariants
//! - Cached goals are ordered by `created_at_ms`, newest first.
//! - Goal ids are unique within the cache.
//! - A failed remote call leaves the cache exactly as it was.
//! - Results that arrive after `reset` are discarded.
//! - At most one toggle/delete per goal id is in flight, and the goal is
//!   read only while that slot is held.

use crate::model::category::Category;
use crate::model::goal::{Goal, GoalId, NewGoal};
use crate::model::identity::Session;
use crate::repo::goal_repo::{GoalRepository, RepoError};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

pub type CacheResult<T> = Result<T, CacheError>;

/// Goal cache failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Title is empty after trimming; nothing was sent.
    EmptyTitle,
    /// No active session; nothing was sent.
    NoSession,
    /// Another mutation on this goal has not completed yet.
    Busy(GoalId),
    /// Remote store rejected or failed the call.
    Remote(RepoError),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "goal title cannot be empty"),
            Self::NoSession => write!(f, "no active session"),
            Self::Busy(id) => write!(f, "goal {id} already has a pending change"),
            Self::Remote(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Remote(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CacheError {
    fn from(value: RepoError) -> Self {
        Self::Remote(value)
    }
}

#[derive(Debug, Default)]
struct CacheState {
    owner_id: Option<String>,
    goals: Vec<Goal>,
    generation: u64,
}

/// In-memory mirror of the active session's goals.
pub struct GoalCache {
    repo: Arc<dyn GoalRepository>,
    state: Mutex<CacheState>,
    in_flight: Mutex<HashSet<GoalId>>,
    pending_calls: AtomicUsize,
}

impl GoalCache {
    pub fn new(repo: Arc<dyn GoalRepository>) -> Self {
        Self {
            repo,
            state: Mutex::new(CacheState::default()),
            in_flight: Mutex::new(HashSet::new()),
            pending_calls: AtomicUsize::new(0),
        }
    }

    /// Clears all goals and binds the cache to `owner_id`.
    pub fn reset(&self, owner_id: Option<&str>) {
        let mut state = self.state();
        state.goals.clear();
        state.owner_id = owner_id.map(str::to_string);
        state.generation += 1;
    }

    /// Owner id the cache is bound to.
    pub fn owner_id(&self) -> Option<String> {
        self.state().owner_id.clone()
    }

    /// Snapshot of cached goals in display order.
    pub fn goals(&self) -> Vec<Goal> {
        self.state().goals.clone()
    }

    pub fn get(&self, id: &GoalId) -> Option<Goal> {
        self.state().goals.iter().find(|goal| goal.id == *id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state().goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().goals.is_empty()
    }

    /// True while any remote call issued by this cache is outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending_calls.load(Ordering::SeqCst) > 0
    }

    /// Replaces cached goals with the remote collection for `session`.
    ///
    /// On failure the previous contents stay in place and the error is
    /// returned for logging.
    pub fn load(&self, session: &Session) -> CacheResult<usize> {
        let generation = self.state().generation;
        let fetched = {
            let _call = CallGuard::enter(&self.pending_calls);
            self.repo.list_goals(session)
        };

        match fetched {
            Ok(mut goals) => {
                goals.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
                let count = goals.len();
                let mut state = self.state();
                if state.generation != generation {
                    info!("event=goals_load module=cache status=discarded reason=reset");
                    return Ok(state.goals.len());
                }
                state.goals = goals;
                state.owner_id = Some(session.owner_id().to_string());
                info!("event=goals_load module=cache status=ok count={count}");
                Ok(count)
            }
            Err(err) => {
                warn!(
                    "event=goals_load module=cache status=error kind={}",
                    err.kind.as_str()
                );
                Err(err.into())
            }
        }
    }

    /// Creates a goal remotely and inserts the stored row.
    ///
    /// # Errors
    /// - `EmptyTitle` / `NoSession` before any remote call.
    /// - `Remote` when the store fails; the cache is unchanged.
    pub fn create(
        &self,
        session: Option<&Session>,
        title: &str,
        category: Category,
    ) -> CacheResult<Goal> {
        let draft = NewGoal::new(title, category).ok_or(CacheError::EmptyTitle)?;
        let session = session.ok_or(CacheError::NoSession)?;

        let generation = self.state().generation;
        let created = {
            let _call = CallGuard::enter(&self.pending_calls);
            self.repo.insert_goal(session, &draft)
        };
        let goal = created.map_err(|err| {
            warn!(
                "event=goal_create module=cache status=error kind={}",
                err.kind.as_str()
            );
            CacheError::from(err)
        })?;

        let mut state = self.state();
        if state.generation == generation {
            state.goals.retain(|existing| existing.id != goal.id);
            let position = state
                .goals
                .iter()
                .position(|existing| existing.created_at_ms <= goal.created_at_ms)
                .unwrap_or(state.goals.len());
            state.goals.insert(position, goal.clone());
        }
        info!(
            "event=goal_create module=cache status=ok category={}",
            goal.category.color_key()
        );
        Ok(goal)
    }

    /// Flips `completed` on goal `id` once the store confirms it.
    ///
    /// Returns the new value, or `None` when `id` is not cached (no remote
    /// call is made in that case).
    pub fn toggle(&self, session: &Session, id: &GoalId) -> CacheResult<Option<bool>> {
        let guard = InFlightGuard::acquire(&self.in_flight, id)?;
        let Some(current) = self.get(id) else {
            drop(guard);
            return Ok(None);
        };
        let next = !current.completed;

        let generation = self.state().generation;
        let updated = {
            let _call = CallGuard::enter(&self.pending_calls);
            self.repo.set_completed(session, id, next)
        };
        if let Err(err) = updated {
            warn!(
                "event=goal_toggle module=cache status=error kind={}",
                err.kind.as_str()
            );
            return Err(err.into());
        }

        let mut state = self.state();
        if state.generation == generation {
            if let Some(goal) = state.goals.iter_mut().find(|goal| goal.id == *id) {
                goal.completed = next;
            }
        }
        info!("event=goal_toggle module=cache status=ok completed={next}");
        Ok(Some(next))
    }

    /// Deletes goal `id` once the store confirms it.
    ///
    /// Returns `false` when `id` is not cached (no remote call is made).
    pub fn delete(&self, session: &Session, id: &GoalId) -> CacheResult<bool> {
        let guard = InFlightGuard::acquire(&self.in_flight, id)?;
        if self.get(id).is_none() {
            drop(guard);
            return Ok(false);
        }

        let generation = self.state().generation;
        let deleted = {
            let _call = CallGuard::enter(&self.pending_calls);
            self.repo.delete_goal(session, id)
        };
        if let Err(err) = deleted {
            warn!(
                "event=goal_delete module=cache status=error kind={}",
                err.kind.as_str()
            );
            return Err(err.into());
        }

        let mut state = self.state();
        if state.generation == generation {
            state.goals.retain(|goal| goal.id != *id);
        }
        info!("event=goal_delete module=cache status=ok");
        Ok(true)
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

struct CallGuard<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> CallGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<GoalId>>,
    id: GoalId,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(set: &'a Mutex<HashSet<GoalId>>, id: &GoalId) -> CacheResult<Self> {
        let mut ids = set.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !ids.insert(id.clone()) {
            return Err(CacheError::Busy(id.clone()));
        }
        Ok(Self {
            set,
            id: id.clone(),
        })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheError, GoalCache, InFlightGuard};
    use crate::model::category::Category;
    use crate::model::goal::GoalId;
    use crate::model::identity::{Identity, Session};
    use crate::repo::memory_repo::{MemoryGoalRepository, RepoOp};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    fn session() -> Session {
        Session {
            identity: Identity {
                id: "owner-1".to_string(),
                email: "ana@focodiario.com".to_string(),
                display_name: None,
            },
            access_token: "token".to_string(),
            refresh_token: None,
        }
    }

    #[test]
    fn in_flight_guard_rejects_same_id_until_dropped() {
        let set = Mutex::new(HashSet::new());
        let id = GoalId::new("g1");
        let first = InFlightGuard::acquire(&set, &id).expect("first acquire");
        assert_eq!(
            InFlightGuard::acquire(&set, &id).err(),
            Some(CacheError::Busy(id.clone()))
        );
        assert!(InFlightGuard::acquire(&set, &GoalId::new("g2")).is_ok());
        drop(first);
        assert!(InFlightGuard::acquire(&set, &id).is_ok());
    }

    #[test]
    fn busy_id_never_reaches_remote() {
        let repo = Arc::new(MemoryGoalRepository::new());
        let cache = GoalCache::new(repo.clone());
        let session = session();
        let goal = cache
            .create(Some(&session), "Correr", Category::Health)
            .unwrap();

        let _held = InFlightGuard::acquire(&cache.in_flight, &goal.id).unwrap();
        assert_eq!(
            cache.toggle(&session, &goal.id),
            Err(CacheError::Busy(goal.id.clone()))
        );
        assert_eq!(
            cache.delete(&session, &goal.id),
            Err(CacheError::Busy(goal.id.clone()))
        );
        assert_eq!(repo.calls(RepoOp::Update), 0);
        assert_eq!(repo.calls(RepoOp::Delete), 0);
    }

    #[test]
    fn reset_discards_previous_owner_goals() {
        let repo = Arc::new(MemoryGoalRepository::new());
        let cache = GoalCache::new(repo);
        let session = session();
        cache
            .create(Some(&session), "Correr", Category::Health)
            .unwrap();
        cache.reset(Some("owner-2"));
        assert!(cache.is_empty());
        assert_eq!(cache.owner_id().as_deref(), Some("owner-2"));
        assert!(!cache.is_busy());
    }
}
