//! Root application controller.
//!
//! # Responsibility
//! - Own the session controller, the goal cache and transient UI state.
//! - Reset and refetch the cache whenever the session identity changes.
//! - Build the screen snapshot the UI shell renders.
//!
//! # Invariants
//! - The cache is bound to the active identity (or to none) after every
//!   public call returns.
//! - Mutations go through the cache's remote-first path only.

use crate::auth::provider::IdentityProvider;
use crate::model::category::Category;
use crate::model::goal::{Goal, GoalId};
use crate::model::identity::Session;
use crate::repo::goal_repo::GoalRepository;
use crate::service::goal_cache::{CacheError, CacheResult, GoalCache};
use crate::service::session_controller::{AuthError, LogoutOutcome, SessionController};
use crate::view::achievements::AchievementsView;
use crate::view::form::{AuthForm, GoalForm};
use crate::view::goal_list::GoalListView;
use crate::view::header::HeaderView;
use crate::view::history::HistoryView;
use crate::view::settings::SettingsView;
use crate::view::Tab;
use chrono::{Local, NaiveDate};
use log::info;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct UiState {
    tab: Tab,
    goal_form: GoalForm,
    auth_form: AuthForm,
}

/// Content of the active tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabContent {
    Goals(GoalListView),
    History(HistoryView),
    Achievements(AchievementsView),
    Settings(SettingsView),
}

/// Signed-in screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainScreen {
    pub header: HeaderView,
    pub tab: Tab,
    pub content: TabContent,
    /// Present only while the creation overlay is open on the goals tab.
    pub goal_form: Option<GoalForm>,
    /// A remote call is outstanding.
    pub loading: bool,
}

/// Everything the UI shell needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Startup session resolution has not finished.
    Loading,
    Auth(AuthForm),
    Main(Box<MainScreen>),
}

/// Application root; one per running UI.
pub struct App {
    session: SessionController,
    cache: GoalCache,
    ui: Mutex<UiState>,
}

impl App {
    pub fn new(repo: Arc<dyn GoalRepository>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            session: SessionController::new(identity),
            cache: GoalCache::new(repo),
            ui: Mutex::new(UiState::default()),
        }
    }

    /// Builds an app over one backend implementing both remote contracts.
    pub fn with_backend<B>(backend: Arc<B>) -> Self
    where
        B: GoalRepository + IdentityProvider + 'static,
    {
        Self::new(backend.clone(), backend)
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn cache(&self) -> &GoalCache {
        &self.cache
    }

    /// Resolves any existing session and performs the initial fetch.
    pub fn start(&self) -> Option<Session> {
        let session = self.session.resolve_existing_session();
        self.sync_session();
        session
    }

    /// Rebinds the cache when the active identity differs from its owner.
    ///
    /// Returns `true` when the cache was reset. Load failures are logged by
    /// the cache and leave it empty.
    pub fn sync_session(&self) -> bool {
        let active = self.session.active_session();
        let active_owner = active.as_ref().map(|session| session.owner_id().to_string());
        if self.cache.owner_id() == active_owner {
            return false;
        }

        info!(
            "event=cache_rebind module=app status=ok signed_in={}",
            active_owner.is_some()
        );
        self.cache.reset(active_owner.as_deref());
        *self.ui() = UiState::default();
        if let Some(session) = active {
            let _ = self.cache.load(&session);
        }
        true
    }

    /// Authenticates and loads the new identity's goals.
    pub fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        self.ui().auth_form.begin_submit();
        let result = self.session.authenticate(username, password);
        self.ui()
            .auth_form
            .finish_submit(result.as_ref().err().map(ToString::to_string));
        if result.is_ok() {
            self.sync_session();
        }
        result
    }

    pub fn set_auth_input(&self, username: &str, password: &str) {
        let mut ui = self.ui();
        ui.auth_form.username = username.to_string();
        ui.auth_form.password = password.to_string();
    }

    /// Submits the auth form's current input.
    pub fn submit_auth(&self) -> Result<Session, AuthError> {
        let (username, password) = {
            let ui = self.ui();
            (ui.auth_form.username.clone(), ui.auth_form.password.clone())
        };
        self.login(&username, &password)
    }

    /// Logs out after confirmation and clears the cache.
    pub fn logout(&self, confirm: impl FnOnce(&str) -> bool) -> LogoutOutcome {
        let outcome = self.session.logout(confirm);
        if outcome == LogoutOutcome::SignedOut {
            self.sync_session();
        }
        outcome
    }

    pub fn select_tab(&self, tab: Tab) {
        let mut ui = self.ui();
        ui.tab = tab;
        if tab != Tab::Goals {
            ui.goal_form.open = false;
        }
    }

    pub fn open_goal_form(&self) {
        let mut ui = self.ui();
        if ui.tab == Tab::Goals {
            ui.goal_form.open();
        }
    }

    pub fn dismiss_goal_form(&self) {
        self.ui().goal_form.dismiss();
    }

    pub fn set_goal_title(&self, title: &str) {
        self.ui().goal_form.set_title(title);
    }

    pub fn select_goal_category(&self, category: Category) {
        self.ui().goal_form.select_category(category);
    }

    /// Creates a goal from the form; clears and closes it on success.
    pub fn submit_goal_form(&self) -> CacheResult<Goal> {
        let (title, category) = {
            let ui = self.ui();
            (ui.goal_form.title.clone(), ui.goal_form.category)
        };
        let goal = self.create_goal(&title, category)?;
        self.ui().goal_form.dismiss();
        Ok(goal)
    }

    pub fn create_goal(&self, title: &str, category: Category) -> CacheResult<Goal> {
        self.sync_session();
        let session = self.session.active_session();
        self.cache.create(session.as_ref(), title, category)
    }

    pub fn toggle_goal(&self, id: &GoalId) -> CacheResult<Option<bool>> {
        let session = self.require_session()?;
        self.cache.toggle(&session, id)
    }

    pub fn delete_goal(&self, id: &GoalId) -> CacheResult<bool> {
        let session = self.require_session()?;
        self.cache.delete(&session, id)
    }

    /// Builds the frame for `today`.
    pub fn screen(&self, today: NaiveDate) -> Screen {
        if !self.session.is_resolved() {
            return Screen::Loading;
        }
        self.sync_session();
        let Some(session) = self.session.active_session() else {
            return Screen::Auth(self.ui().auth_form.clone());
        };

        let goals = self.cache.goals();
        let identity = &session.identity;
        let ui = self.ui();
        let content = match ui.tab {
            Tab::Goals => TabContent::Goals(GoalListView::build(&goals)),
            Tab::History => TabContent::History(HistoryView::build(&goals)),
            Tab::Achievements => TabContent::Achievements(AchievementsView::build(&goals)),
            Tab::Settings => TabContent::Settings(SettingsView::build(identity)),
        };
        Screen::Main(Box::new(MainScreen {
            header: HeaderView::build(identity.display_name(), today),
            tab: ui.tab,
            content,
            goal_form: (ui.tab == Tab::Goals && ui.goal_form.open).then(|| ui.goal_form.clone()),
            loading: self.cache.is_busy(),
        }))
    }

    /// Builds the frame for the local calendar date.
    pub fn current_screen(&self) -> Screen {
        self.screen(Local::now().date_naive())
    }

    fn require_session(&self) -> CacheResult<Session> {
        self.sync_session();
        self.session.active_session().ok_or(CacheError::NoSession)
    }

    fn ui(&self) -> MutexGuard<'_, UiState> {
        self.ui.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
