//! Integration tests for session persistence across storefront restarts.
//!
//! Each test opens storefronts over a temporary data directory, the way
//! separate CLI invocations do.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use scoder_integration_tests::test_config;
use scoder_storefront::Storefront;
use scoder_storefront::services::{LoginForm, RegisterForm};
use scoder_storefront::session::SESSION_KEY;

// The catalog is never fetched here
const CATALOG_URL: &str = "http://127.0.0.1:9/products";

fn open(dir: &Path) -> Storefront {
    Storefront::open(test_config(CATALOG_URL, dir).unwrap()).unwrap()
}

fn session_file(dir: &Path) -> std::path::PathBuf {
    dir.join(format!("{SESSION_KEY}.json"))
}

fn login_form() -> LoginForm {
    LoginForm {
        email: "jane@example.com".to_string(),
        password: "secret1".to_string(),
    }
}

#[tokio::test]
async fn test_login_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let user = {
        let storefront = open(dir.path());
        storefront.auth().login(&login_form()).await.unwrap()
    };
    assert!(session_file(dir.path()).exists());

    let storefront = open(dir.path());
    assert!(storefront.store().state().user.is_none());

    let restored = storefront.restore_session().unwrap();
    assert_eq!(restored, user);
    assert_eq!(storefront.store().state().user, Some(user));
}

#[tokio::test]
async fn test_registered_user_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let form = RegisterForm {
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        password: "secret1".to_string(),
        confirm_password: "secret1".to_string(),
    };

    let user = open(dir.path()).auth().register(&form).await.unwrap();

    let restored = open(dir.path()).restore_session().unwrap();
    assert_eq!(restored.name, "Jane Doe");
    assert_eq!(restored.id, user.id);
}

#[tokio::test]
async fn test_logout_removes_saved_session() {
    let dir = tempfile::tempdir().unwrap();
    open(dir.path()).auth().login(&login_form()).await.unwrap();

    let storefront = open(dir.path());
    storefront.restore_session().unwrap();
    storefront.auth().logout();
    assert!(!session_file(dir.path()).exists());

    assert!(open(dir.path()).restore_session().is_none());
}

#[test]
fn test_fresh_data_dir_has_no_session() {
    let dir = tempfile::tempdir().unwrap();
    let storefront = open(&dir.path().join("not-created-yet"));

    assert!(storefront.restore_session().is_none());
    assert!(!storefront.store().state().is_authenticated());
}

#[test]
fn test_malformed_session_file_reads_as_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(session_file(dir.path()), "{not json").unwrap();

    let storefront = open(dir.path());
    assert!(storefront.restore_session().is_none());
    assert!(storefront.store().state().user.is_none());
}

#[test]
fn test_session_with_invalid_email_reads_as_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        session_file(dir.path()),
        r#"{"id": "1", "email": "not-an-email", "name": "jane"}"#,
    )
    .unwrap();

    assert!(open(dir.path()).restore_session().is_none());
}

#[tokio::test]
async fn test_session_file_holds_plain_user_json() {
    let dir = tempfile::tempdir().unwrap();
    open(dir.path()).auth().login(&login_form()).await.unwrap();

    let raw = std::fs::read_to_string(session_file(dir.path())).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"id": "1", "email": "jane@example.com", "name": "jane"})
    );
}
