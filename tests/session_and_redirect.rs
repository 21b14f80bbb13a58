mod common;

use std::time::Duration;

use common::{FakeBackend, PASSWORD, TOKEN, TestApp, USERNAME};

#[tokio::test]
async fn test_login_persists_session_for_next_start() {
    let backend = FakeBackend::start().await;
    let app = TestApp::signed_out(&backend);
    assert!(!app.state.session.is_authenticated());

    app.state.auth.login(USERNAME, PASSWORD).await.unwrap();

    assert!(app.state.session.is_authenticated());
    assert_eq!(
        app.notifier.successes(),
        vec!["Welcome back! Login Successful."]
    );
    let stored = std::fs::read_to_string(app.session_dir.path().join("session")).unwrap();
    assert_eq!(stored.trim(), TOKEN);

    // Subsequent calls carry the new token.
    app.state.collection.load().await;
    assert_eq!(
        backend.last_request("myurls").unwrap().bearer.as_deref(),
        Some(TOKEN)
    );
}

#[tokio::test]
async fn test_bad_credentials_notify_instead_of_auth_path() {
    let backend = FakeBackend::start().await;
    let app = TestApp::signed_out(&backend);

    assert!(app.state.auth.login(USERNAME, "wrong").await.is_err());

    assert_eq!(
        app.notifier.errors(),
        vec!["Login failed. Please check your credentials."]
    );
    assert_eq!(app.state.auth_failure(), None);
    assert!(!app.state.session.is_authenticated());
    assert!(!app.session_dir.path().join("session").exists());
}

#[tokio::test]
async fn test_register_does_not_sign_in() {
    let backend = FakeBackend::start().await;
    let app = TestApp::signed_out(&backend);

    app.state
        .auth
        .register("new-user", "new@example.com", PASSWORD)
        .await
        .unwrap();
    assert!(
        app.state
            .auth
            .register("taken", "taken@example.com", PASSWORD)
            .await
            .is_err()
    );

    assert_eq!(
        app.notifier.successes(),
        vec!["Registration Successful! Please log in."]
    );
    assert_eq!(app.notifier.errors(), vec!["Username is already taken"]);
    assert!(!app.state.session.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_session_file() {
    let backend = FakeBackend::start().await;
    let app = TestApp::signed_in(&backend);
    assert!(app.state.session.is_authenticated());

    app.state.auth.logout().unwrap();

    assert!(!app.state.session.is_authenticated());
    assert!(!app.session_dir.path().join("session").exists());
}

#[tokio::test]
async fn test_open_navigates_to_backend_after_delay() {
    let backend = FakeBackend::start().await;
    let app = TestApp::signed_out(&backend);

    let target = app.state.redirects.resolve("/s/launch").unwrap();
    assert_eq!(target, format!("{}/launch", backend.url));
    assert!(app.navigator.visits.lock().is_empty());

    // Same token again while pending: still a single navigation.
    app.state.redirects.resolve("/s/launch");
    app.state.redirects.wait().await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(*app.navigator.visits.lock(), vec![target]);
}
