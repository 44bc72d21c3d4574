// SPDX-License-Identifier: MIT

//! Tests for token caching around the login handshake.

use chrono::Utc;
use skolae_ical::error::AppError;
use skolae_ical::models::TokenRecord;
use skolae_ical::services::{AuthClient, AuthService, TokenStore};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn auth_service(upstream: &MockServer, dir: &TempDir, username: &str) -> (AuthService, TokenStore) {
    let store = TokenStore::new(dir.path().join("token.json"));
    let service = AuthService::new(
        AuthClient::with_base_url(upstream.uri()),
        store.clone(),
        username.to_string(),
        "password".to_string(),
    );
    (service, store)
}

#[tokio::test]
async fn test_token_is_cached_across_calls() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth/authorize"))
        .respond_with(common::login_redirect("fresh_token", 7200))
        .expect(1) // one real login for three obtain calls
        .mount(&upstream)
        .await;

    let dir = TempDir::new().unwrap();
    let (service, _store) = auth_service(&upstream, &dir, "alice");

    for _ in 0..3 {
        assert_eq!(service.obtain_token().await.unwrap(), "fresh_token");
    }
}

#[tokio::test]
async fn test_expired_record_triggers_relogin_and_overwrite() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth/authorize"))
        .respond_with(common::login_redirect("new_token", 7200))
        .expect(1)
        .mount(&upstream)
        .await;

    let dir = TempDir::new().unwrap();
    let (service, store) = auth_service(&upstream, &dir, "alice");

    // Simulated clock: the record was issued two hours ago with a
    // one-hour lifetime.
    let now = Utc::now().timestamp();
    store
        .save(&TokenRecord {
            username: "alice".to_string(),
            access_token: "stale_token".to_string(),
            expires_in: 3600,
            timestamp: now - 7200,
        })
        .await
        .unwrap();

    assert_eq!(service.obtain_token().await.unwrap(), "new_token");

    let record = store.load().await.unwrap().expect("record must exist");
    assert_eq!(record.access_token, "new_token", "login must overwrite");
    assert_eq!(record.expires_in, 7200);
}

#[tokio::test]
async fn test_record_for_another_username_is_not_reused() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth/authorize"))
        .respond_with(common::login_redirect("alice_token", 7200))
        .expect(1)
        .mount(&upstream)
        .await;

    let dir = TempDir::new().unwrap();
    let (service, store) = auth_service(&upstream, &dir, "alice");

    let now = Utc::now().timestamp();
    store
        .save(&TokenRecord {
            username: "bob".to_string(),
            access_token: "bob_token".to_string(),
            expires_in: 7200,
            timestamp: now,
        })
        .await
        .unwrap();

    assert_eq!(service.obtain_token().await.unwrap(), "alice_token");
}

#[tokio::test]
async fn test_corrupt_cache_file_falls_back_to_login() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth/authorize"))
        .respond_with(common::login_redirect("recovered_token", 7200))
        .expect(1)
        .mount(&upstream)
        .await;

    let dir = TempDir::new().unwrap();
    tokio::fs::write(dir.path().join("token.json"), b"{not json")
        .await
        .unwrap();
    let (service, _store) = auth_service(&upstream, &dir, "alice");

    assert_eq!(service.obtain_token().await.unwrap(), "recovered_token");
}

#[tokio::test]
async fn test_non_redirect_login_response_is_an_auth_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth/authorize"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&upstream)
        .await;

    let dir = TempDir::new().unwrap();
    let (service, store) = auth_service(&upstream, &dir, "alice");

    let err = service.obtain_token().await.unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));
    assert!(
        store.load().await.unwrap().is_none(),
        "a failed login must not persist anything"
    );
}

#[tokio::test]
async fn test_redirect_without_token_fragment_is_a_parse_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth/authorize"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "https://skolae.example/landing"),
        )
        .mount(&upstream)
        .await;

    let dir = TempDir::new().unwrap();
    let (service, _store) = auth_service(&upstream, &dir, "alice");

    let err = service.obtain_token().await.unwrap_err();
    assert!(matches!(err, AppError::Parse(_)));
}
