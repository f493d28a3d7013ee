use chrono::NaiveDate;
use focodiario_core::view::history::EMPTY_TEXT as HISTORY_EMPTY_TEXT;
use focodiario_core::{
    App, CacheError, Category, Goal, GoalId, LogoutOutcome, MemoryGoalRepository,
    MemoryIdentityProvider, RemoteErrorKind, RepoError, RepoOp, Screen, Session, Tab,
    TabContent,
};
use std::sync::Arc;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

fn setup() -> (Arc<MemoryGoalRepository>, Arc<MemoryIdentityProvider>, App) {
    let repo = Arc::new(MemoryGoalRepository::with_clock(1_700_000_000_000));
    let identity = Arc::new(MemoryIdentityProvider::new());
    let app = App::new(repo.clone(), identity.clone());
    (repo, identity, app)
}

fn goal(id: &str, title: &str, completed: bool, created_at_ms: i64) -> Goal {
    Goal {
        id: GoalId::new(id),
        title: title.to_string(),
        category: Category::Work,
        completed,
        created_at_ms,
    }
}

fn restored(identity: &MemoryIdentityProvider, email: &str, name: &str) -> Session {
    identity.register_account(email, "x", Some(name));
    identity.restore_session(email).unwrap()
}

fn main_screen(app: &App) -> focodiario_core::MainScreen {
    match app.screen(today()) {
        Screen::Main(main) => *main,
        other => panic!("expected main screen, got {other:?}"),
    }
}

#[test]
fn loading_until_started_then_auth_without_session() {
    let (_repo, _identity, app) = setup();
    assert_eq!(app.screen(today()), Screen::Loading);

    assert!(app.start().is_none());
    assert!(matches!(app.screen(today()), Screen::Auth(_)));
}

#[test]
fn start_with_restored_session_loads_goals() {
    let (repo, identity, app) = setup();
    let session = restored(&identity, "ana@focodiario.com", "ana");
    repo.seed(session.owner_id(), goal("1", "Run", false, 10));

    app.start();
    let main = main_screen(&app);

    assert_eq!(main.header.greeting, "Olá, ana!");
    assert_eq!(main.tab, Tab::Goals);
    let TabContent::Goals(list) = main.content else {
        panic!("expected goals tab");
    };
    assert_eq!(list.rows.len(), 1);
    assert_eq!(list.rows[0].title, "Run");
    assert_eq!(list.empty_text, None);
}

#[test]
fn login_creates_account_and_shows_empty_goal_list() {
    let (repo, _identity, app) = setup();
    app.start();

    app.set_auth_input("ana", "x");
    let session = app.submit_auth().unwrap();

    assert_eq!(app.cache().owner_id().as_deref(), Some(session.owner_id()));
    assert_eq!(repo.calls(RepoOp::List), 1);
    let main = main_screen(&app);
    let TabContent::Goals(list) = main.content else {
        panic!("expected goals tab");
    };
    assert!(list.rows.is_empty());
    assert_eq!(list.stats.summary(), "0 de 0 metas finalizadas");
}

#[test]
fn failed_login_keeps_auth_form_with_error() {
    let (_repo, identity, app) = setup();
    app.start();
    identity.fail_next_sign_up(RepoError::new(
        RemoteErrorKind::Rejected,
        "Signups not allowed",
    ));

    app.set_auth_input("ana", "x");
    assert!(app.submit_auth().is_err());

    let Screen::Auth(form) = app.screen(today()) else {
        panic!("expected auth screen");
    };
    assert_eq!(form.error.as_deref(), Some("Signups not allowed"));
    assert!(!form.loading);
    assert_eq!(form.username, "ana");
}

#[test]
fn identity_change_clears_and_refetches_cache() {
    let (repo, identity, app) = setup();
    let ana = restored(&identity, "ana@focodiario.com", "ana");
    repo.seed(ana.owner_id(), goal("1", "ana goal", false, 10));
    app.start();
    assert_eq!(app.cache().len(), 1);

    identity.register_account("bia@focodiario.com", "y", Some("bia"));
    let bia = app.login("bia", "y").unwrap();

    assert_eq!(app.cache().owner_id().as_deref(), Some(bia.owner_id()));
    assert!(app.cache().get(&GoalId::new("1")).is_none());
    assert_eq!(repo.calls(RepoOp::List), 2);
}

#[test]
fn external_sign_out_returns_to_auth_and_clears_cache() {
    let (repo, identity, app) = setup();
    let session = restored(&identity, "ana@focodiario.com", "ana");
    repo.seed(session.owner_id(), goal("1", "Run", false, 10));
    app.start();

    identity.expire_session();

    assert!(matches!(app.screen(today()), Screen::Auth(_)));
    assert!(app.cache().is_empty());
    assert_eq!(app.cache().owner_id(), None);
}

#[test]
fn logout_flow_requires_confirmation() {
    let (_repo, identity, app) = setup();
    restored(&identity, "ana@focodiario.com", "ana");
    app.start();

    assert_eq!(app.logout(|_| false), LogoutOutcome::Cancelled);
    assert!(matches!(app.screen(today()), Screen::Main(_)));

    assert_eq!(app.logout(|_| true), LogoutOutcome::SignedOut);
    assert!(matches!(app.screen(today()), Screen::Auth(_)));
}

#[test]
fn goal_form_submit_clears_on_success_and_keeps_input_on_failure() {
    let (repo, identity, app) = setup();
    restored(&identity, "ana@focodiario.com", "ana");
    app.start();

    app.open_goal_form();
    app.set_goal_title("   ");
    assert_eq!(app.submit_goal_form(), Err(CacheError::EmptyTitle));
    assert!(main_screen(&app).goal_form.is_some());

    app.set_goal_title("Ler 10 páginas");
    app.select_goal_category(Category::Studies);
    repo.fail_next(
        RepoOp::Insert,
        RepoError::new(RemoteErrorKind::Network, "offline"),
    );
    assert!(app.submit_goal_form().is_err());
    let form = main_screen(&app).goal_form.unwrap();
    assert_eq!(form.title, "Ler 10 páginas");
    assert_eq!(form.category, Category::Studies);

    let created = app.submit_goal_form().unwrap();
    assert_eq!(created.category, Category::Studies);
    let main = main_screen(&app);
    assert_eq!(main.goal_form, None);

    app.open_goal_form();
    let reopened = main_screen(&app).goal_form.unwrap();
    assert_eq!(reopened.title, "");
    assert_eq!(reopened.category, Category::Personal);
}

#[test]
fn goal_form_is_only_visible_on_goals_tab() {
    let (_repo, identity, app) = setup();
    restored(&identity, "ana@focodiario.com", "ana");
    app.start();

    app.select_tab(Tab::History);
    app.open_goal_form();
    assert_eq!(main_screen(&app).goal_form, None);

    app.select_tab(Tab::Goals);
    app.open_goal_form();
    app.select_tab(Tab::Settings);
    app.select_tab(Tab::Goals);
    assert_eq!(main_screen(&app).goal_form, None);
}

#[test]
fn history_lists_completed_goals_only() {
    let (repo, identity, app) = setup();
    let session = restored(&identity, "ana@focodiario.com", "ana");
    repo.seed(session.owner_id(), goal("1", "done", true, 10));
    repo.seed(session.owner_id(), goal("2", "open", false, 20));
    app.start();

    app.select_tab(Tab::History);
    let TabContent::History(history) = main_screen(&app).content else {
        panic!("expected history tab");
    };
    assert_eq!(history.rows.len(), 1);
    assert_eq!(history.rows[0].title, "done");

    app.toggle_goal(&GoalId::new("1")).unwrap();
    let TabContent::History(history) = main_screen(&app).content else {
        panic!("expected history tab");
    };
    assert!(history.rows.is_empty());
    assert_eq!(history.empty_text, Some(HISTORY_EMPTY_TEXT));
}

#[test]
fn achievements_unlock_with_completed_count() {
    let (repo, identity, app) = setup();
    let session = restored(&identity, "ana@focodiario.com", "ana");
    for i in 0..5 {
        repo.seed(
            session.owner_id(),
            goal(&format!("g{i}"), "meta", false, i64::from(i)),
        );
    }
    app.start();
    app.select_tab(Tab::Achievements);

    let TabContent::Achievements(view) = main_screen(&app).content else {
        panic!("expected achievements tab");
    };
    assert_eq!(view.completed, 0);
    assert_eq!(view.unlocked_count(), 0);

    for i in 0..5 {
        app.toggle_goal(&GoalId::new(format!("g{i}"))).unwrap();
    }
    let TabContent::Achievements(view) = main_screen(&app).content else {
        panic!("expected achievements tab");
    };
    assert_eq!(view.completed, 5);
    assert!(view.badges.iter().all(|badge| badge.unlocked));
}

#[test]
fn settings_show_identity_and_mutations_require_session() {
    let (_repo, identity, app) = setup();
    app.start();
    assert_eq!(
        app.delete_goal(&GoalId::new("1")),
        Err(CacheError::NoSession)
    );
    assert_eq!(
        app.create_goal("Run", Category::Health),
        Err(CacheError::NoSession)
    );

    restored(&identity, "ana@focodiario.com", "Ana");
    app.start();
    app.select_tab(Tab::Settings);
    let TabContent::Settings(settings) = main_screen(&app).content else {
        panic!("expected settings tab");
    };
    assert_eq!(settings.display_name, "Ana");
    assert_eq!(settings.email, "ana@focodiario.com");
}
