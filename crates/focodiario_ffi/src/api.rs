//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Flatten core screens into plain snapshot structs.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call before `app_configure` succeeds returns a failure envelope.
//! - The process holds at most one configured `App`.

use focodiario_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    App, CacheError, Category, GoalId, LogoutOutcome, MainScreen, RemoteConfig, Screen,
    SupabaseClient, Tab, TabContent,
};
use focodiario_core::view::goal_list::GoalRowView;
use log::info;
use std::sync::{Arc, OnceLock};

static APP: OnceLock<App> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Builds the process-wide app over the hosted backend.
///
/// # FFI contract
/// - Sync call; performs no network I/O.
/// - Returns empty string on success and error message on failure.
/// - A second call after success returns an error and keeps the first app.
#[flutter_rust_bridge::frb(sync)]
pub fn app_configure(endpoint: String, api_key: String) -> String {
    match RemoteConfig::new(&endpoint, &api_key) {
        Ok(config) => install(config),
        Err(err) => format!("app_configure failed: {err}"),
    }
}

/// Same as [`app_configure`], reading `FOCODIARIO_SUPABASE_URL` and
/// `FOCODIARIO_SUPABASE_ANON_KEY`.
#[flutter_rust_bridge::frb(sync)]
pub fn app_configure_from_env() -> String {
    match RemoteConfig::from_env() {
        Ok(config) => install(config),
        Err(err) => format!("app_configure failed: {err}"),
    }
}

/// One goal row as drawn by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalItem {
    pub id: String,
    pub title: String,
    pub category: String,
    pub color_key: String,
    pub icon_key: String,
    pub completed: bool,
}

/// Achievement badge state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeItem {
    pub title: String,
    pub icon_key: String,
    pub color_key: String,
    pub unlocked: bool,
}

/// Flattened frame for the UI shell.
///
/// `screen` is one of `unconfigured|loading|auth|main`. Fields that do not
/// apply to the current screen or tab are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSnapshot {
    pub screen: String,
    /// Tab key (`metas|historico|conquistas|ajustes`).
    pub tab: String,
    pub greeting: String,
    pub date_label: String,
    pub display_name: String,
    pub email: String,
    /// Rows of the goals or history tab.
    pub goals: Vec<GoalItem>,
    pub empty_text: Option<String>,
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
    pub badges: Vec<BadgeItem>,
    pub goal_form_open: bool,
    pub goal_form_title: String,
    pub goal_form_category: String,
    pub auth_error: Option<String>,
    pub loading: bool,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Goal touched by the operation, when any.
    pub goal_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, goal_id: Option<String>) -> Self {
        Self {
            ok: true,
            goal_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            goal_id: None,
            message: message.into(),
        }
    }
}

/// Resolves any existing session and loads its goals.
///
/// # FFI contract
/// - Sync call, network-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn app_start() -> ActionResponse {
    with_app(|app| match app.start() {
        Some(_) => ActionResponse::success("Session restored.", None),
        None => ActionResponse::success("No session.", None),
    })
}

/// Returns the frame to draw now.
#[flutter_rust_bridge::frb(sync)]
pub fn app_snapshot() -> AppSnapshot {
    match APP.get() {
        Some(app) => to_snapshot(app.current_screen()),
        None => AppSnapshot {
            screen: "unconfigured".to_string(),
            ..AppSnapshot::default()
        },
    }
}

/// Signs in, creating the account when the username is new.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_login(username: String, password: String) -> ActionResponse {
    with_app(|app| {
        app.set_auth_input(&username, &password);
        match app.submit_auth() {
            Ok(_) => ActionResponse::success("Signed in.", None),
            Err(err) => ActionResponse::failure(err.to_string()),
        }
    })
}

/// Ends the session when `confirmed` is true.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_logout(confirmed: bool) -> ActionResponse {
    with_app(|app| match app.logout(|_| confirmed) {
        LogoutOutcome::SignedOut => ActionResponse::success("Signed out.", None),
        LogoutOutcome::Cancelled => ActionResponse::failure("Logout cancelled."),
        LogoutOutcome::NotSignedIn => ActionResponse::failure("Not signed in."),
    })
}

/// Switches tab by key; unknown keys are rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn select_tab(key: String) -> ActionResponse {
    let Some(tab) = Tab::from_key(&key) else {
        return ActionResponse::failure(format!("select_tab failed: unknown tab `{key}`"));
    };
    with_app(|app| {
        app.select_tab(tab);
        ActionResponse::success(tab.label(), None)
    })
}

/// Opens or dismisses the goal creation overlay.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_form_set_open(open: bool) -> ActionResponse {
    with_app(|app| {
        if open {
            app.open_goal_form();
        } else {
            app.dismiss_goal_form();
        }
        ActionResponse::success(if open { "Form opened." } else { "Form closed." }, None)
    })
}

/// Creates a goal; `category` is a display label such as `Saúde`.
///
/// # FFI contract
/// - Sync call, network-backed execution.
/// - Blank titles fail without a network call.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_create(title: String, category: String) -> ActionResponse {
    let category = match category.parse::<Category>() {
        Ok(category) => category,
        Err(err) => return ActionResponse::failure(format!("goal_create failed: {err}")),
    };
    with_app(|app| {
        app.set_goal_title(&title);
        app.select_goal_category(category);
        match app.submit_goal_form() {
            Ok(goal) => ActionResponse::success("Goal created.", Some(goal.id.to_string())),
            Err(err) => ActionResponse::failure(format!("goal_create failed: {err}")),
        }
    })
}

/// Flips a goal's completion flag.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_toggle(goal_id: String) -> ActionResponse {
    with_app(|app| match app.toggle_goal(&GoalId::new(goal_id.as_str())) {
        Ok(Some(completed)) => ActionResponse::success(
            if completed { "Goal completed." } else { "Goal reopened." },
            Some(goal_id.clone()),
        ),
        Ok(None) => ActionResponse::failure("Goal not found."),
        Err(err) => ActionResponse::failure(mutation_failure("goal_toggle", &err)),
    })
}

/// Deletes a goal.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_delete(goal_id: String) -> ActionResponse {
    with_app(|app| match app.delete_goal(&GoalId::new(goal_id.as_str())) {
        Ok(true) => ActionResponse::success("Goal deleted.", Some(goal_id.clone())),
        Ok(false) => ActionResponse::failure("Goal not found."),
        Err(err) => ActionResponse::failure(mutation_failure("goal_delete", &err)),
    })
}

fn install(config: RemoteConfig) -> String {
    if APP.get().is_some() {
        return "app_configure failed: app already configured".to_string();
    }
    let client = match SupabaseClient::new(config) {
        Ok(client) => Arc::new(client),
        Err(err) => return format!("app_configure failed: {err}"),
    };
    match APP.set(App::with_backend(client)) {
        Ok(()) => {
            info!("event=app_configure module=ffi status=ok");
            String::new()
        }
        Err(_) => "app_configure failed: app already configured".to_string(),
    }
}

fn with_app(f: impl FnOnce(&App) -> ActionResponse) -> ActionResponse {
    match APP.get() {
        Some(app) => f(app),
        None => ActionResponse::failure("app not configured"),
    }
}

fn mutation_failure(op: &str, err: &CacheError) -> String {
    match err {
        CacheError::Busy(_) => format!("{op} ignored: goal is busy"),
        other => format!("{op} failed: {other}"),
    }
}

fn to_snapshot(screen: Screen) -> AppSnapshot {
    match screen {
        Screen::Loading => AppSnapshot {
            screen: "loading".to_string(),
            loading: true,
            ..AppSnapshot::default()
        },
        Screen::Auth(form) => AppSnapshot {
            screen: "auth".to_string(),
            auth_error: form.error,
            loading: form.loading,
            ..AppSnapshot::default()
        },
        Screen::Main(main) => main_snapshot(*main),
    }
}

fn main_snapshot(main: MainScreen) -> AppSnapshot {
    let mut snapshot = AppSnapshot {
        screen: "main".to_string(),
        tab: main.tab.key().to_string(),
        greeting: main.header.greeting,
        date_label: main.header.date_label,
        loading: main.loading,
        ..AppSnapshot::default()
    };
    if let Some(form) = main.goal_form {
        snapshot.goal_form_open = form.open;
        snapshot.goal_form_category = form.category.label().to_string();
        snapshot.goal_form_title = form.title;
    }

    match main.content {
        TabContent::Goals(list) => {
            snapshot.completed = to_u32(list.stats.completed);
            snapshot.total = to_u32(list.stats.total);
            snapshot.percentage = list.stats.percentage;
            snapshot.empty_text = list.empty_text.map(str::to_string);
            snapshot.goals = list.rows.into_iter().map(to_goal_item).collect();
        }
        TabContent::History(history) => {
            snapshot.empty_text = history.empty_text.map(str::to_string);
            snapshot.goals = history.rows.into_iter().map(to_goal_item).collect();
        }
        TabContent::Achievements(view) => {
            snapshot.completed = to_u32(view.completed);
            snapshot.badges = view
                .badges
                .into_iter()
                .map(|badge| BadgeItem {
                    title: badge.spec.title.to_string(),
                    icon_key: badge.spec.icon_key.to_string(),
                    color_key: badge.spec.color_key.to_string(),
                    unlocked: badge.unlocked,
                })
                .collect();
        }
        TabContent::Settings(settings) => {
            snapshot.display_name = settings.display_name;
            snapshot.email = settings.email;
        }
    }
    snapshot
}

fn to_goal_item(row: GoalRowView) -> GoalItem {
    GoalItem {
        id: row.id.to_string(),
        title: row.title,
        category: row.category_label.to_string(),
        color_key: row.category_color.to_string(),
        icon_key: row.category_icon.to_string(),
        completed: row.completed,
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
