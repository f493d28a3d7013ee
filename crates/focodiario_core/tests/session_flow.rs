use focodiario_core::{
    AuthError, Credentials, IdentityProvider, LogoutOutcome, MemoryIdentityProvider, RemoteErrorKind,
    RepoError, SessionController, SessionState, SignInError, LOGOUT_PROMPT,
    PASSWORD_REQUIRED_MESSAGE, USERNAME_REQUIRED_MESSAGE,
};
use std::sync::Arc;

fn setup() -> (Arc<MemoryIdentityProvider>, SessionController) {
    let provider = Arc::new(MemoryIdentityProvider::new());
    let controller = SessionController::new(provider.clone());
    (provider, controller)
}

#[test]
fn starts_unresolved_and_resolves_to_anonymous_without_session() {
    let (_provider, controller) = setup();
    assert_eq!(controller.state(), SessionState::Unresolved);
    assert!(!controller.is_resolved());

    assert!(controller.resolve_existing_session().is_none());
    assert_eq!(controller.state(), SessionState::Anonymous);
}

#[test]
fn resolves_existing_provider_session() {
    let (provider, controller) = setup();
    provider.register_account("ana@focodiario.com", "x", Some("ana"));
    let restored = provider.restore_session("ana@focodiario.com").unwrap();

    let resolved = controller.resolve_existing_session().unwrap();
    assert_eq!(resolved, restored);
    assert_eq!(controller.active_session(), Some(restored));
}

#[test]
fn resolution_error_fails_open_to_anonymous() {
    let (provider, controller) = setup();
    provider.fail_next_current_session(RepoError::new(RemoteErrorKind::Network, "offline"));

    assert!(controller.resolve_existing_session().is_none());
    assert_eq!(controller.state(), SessionState::Anonymous);
}

#[test]
fn unknown_user_falls_back_to_sign_up_with_display_name() {
    let (provider, controller) = setup();

    let session = controller.authenticate("ana", "x").unwrap();

    assert_eq!(provider.sign_in_attempts(), vec!["ana@focodiario.com"]);
    assert_eq!(
        provider.sign_up_attempts(),
        vec![("ana@focodiario.com".to_string(), "ana".to_string())]
    );
    assert_eq!(session.identity.email, "ana@focodiario.com");
    assert_eq!(session.identity.display_name(), "ana");
    assert_eq!(controller.state(), SessionState::Authenticated(session));
}

#[test]
fn display_name_keeps_raw_username_while_email_is_normalized() {
    let (provider, controller) = setup();
    let session = controller.authenticate("  Ana Paula ", "x").unwrap();

    assert_eq!(session.identity.email, "anapaula@focodiario.com");
    assert_eq!(
        session.identity.display_name.as_deref(),
        Some("  Ana Paula ")
    );
    assert_eq!(session.identity.display_name(), "Ana Paula");
    assert_eq!(provider.sign_up_attempts()[0].1, "  Ana Paula ");
}

#[test]
fn existing_account_signs_in_without_sign_up() {
    let (provider, controller) = setup();
    provider.register_account("ana@focodiario.com", "x", Some("ana"));

    controller.authenticate("Ana", "x").unwrap();
    assert!(provider.sign_up_attempts().is_empty());
}

#[test]
fn non_credential_sign_in_failure_is_surfaced_without_sign_up() {
    let (provider, controller) = setup();
    provider.fail_next_sign_in(SignInError::Remote(RepoError::new(
        RemoteErrorKind::Unavailable,
        "service unavailable",
    )));

    let err = controller.authenticate("ana", "x").unwrap_err();
    assert_eq!(err, AuthError::Remote("service unavailable".to_string()));
    assert!(provider.sign_up_attempts().is_empty());
    assert_eq!(controller.active_session(), None);
}

#[test]
fn sign_up_failure_is_surfaced() {
    let (provider, controller) = setup();
    provider.fail_next_sign_up(RepoError::new(
        RemoteErrorKind::Rejected,
        "Password should be at least 6 characters",
    ));

    let err = controller.authenticate("ana", "x").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Password should be at least 6 characters"
    );
}

#[test]
fn empty_remote_message_uses_fallback_text() {
    let (provider, controller) = setup();
    provider.fail_next_sign_up(RepoError::new(RemoteErrorKind::Rejected, ""));

    let err = controller.authenticate("ana", "x").unwrap_err();
    assert_eq!(err, AuthError::Remote("Erro na autenticação".to_string()));
}

#[test]
fn blank_input_is_rejected_before_provider_call() {
    let (provider, controller) = setup();
    assert_eq!(
        controller.authenticate("   ", "x"),
        Err(AuthError::Validation(USERNAME_REQUIRED_MESSAGE))
    );
    assert_eq!(
        controller.authenticate("ana", ""),
        Err(AuthError::Validation(PASSWORD_REQUIRED_MESSAGE))
    );
    assert!(provider.sign_in_attempts().is_empty());
}

#[test]
fn declined_logout_changes_nothing() {
    let (_provider, controller) = setup();
    let session = controller.authenticate("ana", "x").unwrap();

    let mut asked = None;
    let outcome = controller.logout(|prompt| {
        asked = Some(prompt.to_string());
        false
    });

    assert_eq!(outcome, LogoutOutcome::Cancelled);
    assert_eq!(asked.as_deref(), Some(LOGOUT_PROMPT));
    assert_eq!(controller.active_session(), Some(session));
}

#[test]
fn confirmed_logout_ends_session_even_when_remote_fails() {
    let (provider, controller) = setup();
    controller.authenticate("ana", "x").unwrap();
    provider.fail_next_sign_out(RepoError::new(RemoteErrorKind::Network, "offline"));

    assert_eq!(controller.logout(|_| true), LogoutOutcome::SignedOut);
    assert_eq!(controller.state(), SessionState::Anonymous);
    assert_eq!(provider.current_session().unwrap(), None);
}

#[test]
fn logout_without_session_is_reported() {
    let (_provider, controller) = setup();
    controller.resolve_existing_session();
    assert_eq!(controller.logout(|_| true), LogoutOutcome::NotSignedIn);
}

#[test]
fn external_invalidation_moves_to_anonymous() {
    let (provider, controller) = setup();
    controller.authenticate("ana", "x").unwrap();

    provider.expire_session();
    assert_eq!(controller.state(), SessionState::Anonymous);
}

#[test]
fn token_refresh_notification_replaces_session() {
    let (provider, controller) = setup();
    let original = controller.authenticate("ana", "x").unwrap();

    let refreshed = provider.refresh_session().unwrap();
    let active = controller.active_session().unwrap();
    assert_eq!(active, refreshed);
    assert_ne!(active.access_token, original.access_token);
    assert_eq!(active.identity, original.identity);
}

#[test]
fn sign_in_notification_reaches_controller_before_resolution() {
    let (provider, controller) = setup();
    provider.register_account("ana@focodiario.com", "x", None);
    provider
        .sign_in(&Credentials {
            email: "ana@focodiario.com".to_string(),
            password: "x".to_string(),
        })
        .unwrap();
    assert!(matches!(
        controller.state(),
        SessionState::Authenticated(_)
    ));
}

#[test]
fn dropping_controller_unsubscribes() {
    let (provider, controller) = setup();
    assert_eq!(provider.listener_count(), 1);
    drop(controller);
    assert_eq!(provider.listener_count(), 0);
    provider.expire_session();
}
