//! End-to-end account and credential flows against a throwaway instance.

use std::time::Duration;

use gitloom::app::App;
use gitloom::auth::RequestCredentials;
use gitloom::config::Config;
use gitloom::error::Error;
use gitloom::types::UserRole;
use tempfile::TempDir;

fn open_app(dir: &TempDir) -> App {
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        repos_dir: dir.path().join("repos"),
        session_ttl: None,
    };
    App::open(config).expect("open app")
}

#[tokio::test]
async fn concurrent_duplicate_signups_resolve_to_one_account() {
    let dir = TempDir::new().expect("temp dir");
    let app = open_app(&dir);

    let first = app.signup("ada@example.com", "Ada", "pw-one");
    let second = app.signup("ada@example.com", "Ada", "pw-two");
    let (first, second) = tokio::join!(first, second);

    assert_eq!(
        u8::from(first.is_ok()) + u8::from(second.is_ok()),
        1,
        "exactly one signup wins"
    );
    let err = first.err().or(second.err()).expect("one failure");
    assert!(matches!(err, Error::AlreadyExists("user")));

    assert_eq!(app.store.user_count(), 1);
    let user = app
        .store
        .get_user_by_email("ada@example.com")
        .expect("account exists");
    assert_eq!(user.role, UserRole::Owner);
}

#[tokio::test]
async fn bearer_token_takes_precedence_over_session() {
    let dir = TempDir::new().expect("temp dir");
    let app = open_app(&dir);

    let (ada, _) = app.signup("ada@example.com", "Ada", "pw").await.unwrap();
    let (_, grace_session) = app
        .signup("grace@example.com", "Grace", "pw")
        .await
        .unwrap();

    let issued = app.credentials.issue_pat(&ada.id, "ci", Vec::new()).unwrap();

    let header = format!("Bearer {}", issued.plaintext);
    let creds = RequestCredentials::from_parts(Some(&header), Some(&grace_session));
    let resolved = app.authenticator.require(&creds).unwrap();
    assert_eq!(resolved.id, ada.id, "the token identity wins");
}

#[tokio::test]
async fn revoked_token_stops_authenticating() {
    let dir = TempDir::new().expect("temp dir");
    let app = open_app(&dir);

    let (ada, _) = app.signup("ada@example.com", "Ada", "pw").await.unwrap();
    let issued = app.credentials.issue_pat(&ada.id, "ci", Vec::new()).unwrap();

    let creds = RequestCredentials::bearer(issued.plaintext.clone());
    assert!(app.authenticator.resolve(&creds).is_some());

    app.credentials.revoke_pat(&issued.record.id, &ada.id).unwrap();
    assert!(app.authenticator.resolve(&creds).is_none());

    // The record remains listed for audit.
    let listed = app.credentials.list_pats(&ada.id);
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].status.is_active());
}

#[tokio::test]
async fn sole_user_can_issue_token_without_credentials() {
    let dir = TempDir::new().expect("temp dir");
    let app = open_app(&dir);

    let (ada, _) = app.signup("ada@example.com", "Ada", "pw").await.unwrap();

    let resolved = app
        .authenticator
        .resolve_for_pat_issue(&RequestCredentials::anonymous())
        .unwrap();
    assert_eq!(resolved.id, ada.id);

    // A second account closes the bootstrap window.
    app.signup("grace@example.com", "Grace", "pw")
        .await
        .unwrap();
    let err = app
        .authenticator
        .resolve_for_pat_issue(&RequestCredentials::anonymous())
        .unwrap_err();
    assert!(matches!(err, Error::Unauthenticated));
}

#[tokio::test]
async fn state_survives_reopening_the_instance() {
    let dir = TempDir::new().expect("temp dir");

    {
        let app = open_app(&dir);
        let (ada, _) = app.signup("ada@example.com", "Ada", "pw").await.unwrap();
        app.credentials.issue_pat(&ada.id, "ci", Vec::new()).unwrap();
    }

    let app = open_app(&dir);
    let (user, session) = app.login("ada@example.com", "pw").await.unwrap();
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(app.credentials.list_pats(&user.id).len(), 1);

    // Sessions are per-instance; only the fresh one resolves.
    let resolved = app
        .authenticator
        .require(&RequestCredentials::session(session))
        .unwrap();
    assert_eq!(resolved.id, user.id);
}

#[tokio::test]
async fn expired_session_no_longer_resolves() {
    let dir = TempDir::new().expect("temp dir");
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        repos_dir: dir.path().join("repos"),
        session_ttl: Some(Duration::ZERO),
    };
    let app = App::open(config).expect("open app");

    let (_, session) = app.signup("ada@example.com", "Ada", "pw").await.unwrap();
    assert!(
        app.authenticator
            .resolve(&RequestCredentials::session(session))
            .is_none()
    );
}

#[tokio::test]
async fn logout_leaves_other_sessions_alone() {
    let dir = TempDir::new().expect("temp dir");
    let app = open_app(&dir);

    let (_, first) = app.signup("ada@example.com", "Ada", "pw").await.unwrap();
    let (_, second) = app.login("ada@example.com", "pw").await.unwrap();

    app.logout(&first);
    assert!(
        app.authenticator
            .resolve(&RequestCredentials::session(first))
            .is_none()
    );
    assert!(
        app.authenticator
            .resolve(&RequestCredentials::session(second))
            .is_some()
    );
}
