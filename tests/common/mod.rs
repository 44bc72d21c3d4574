// SPDX-License-Identifier: MIT

//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use skolae_ical::config::Config;
use skolae_ical::services::{AgendaClient, AuthClient, AuthService, CalendarService, TokenStore};
use skolae_ical::AppState;
use tempfile::TempDir;
use wiremock::ResponseTemplate;

/// Build an `AppState` whose upstream clients point at the given mock
/// base URLs and whose cache files live in a fresh temp dir.
pub fn test_state(auth_url: &str, agenda_url: &str) -> (Arc<AppState>, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let config = Config {
        token_cache_path: dir.path().join("token.json"),
        calendar_cache_path: dir.path().join("calendar.ics"),
        ..Config::default()
    };

    let auth = AuthService::new(
        AuthClient::with_base_url(auth_url.to_string()),
        TokenStore::new(config.token_cache_path.clone()),
        config.username.clone(),
        config.password.clone(),
    );
    let calendar = CalendarService::new(
        auth,
        AgendaClient::with_base_url(agenda_url.to_string()),
        config.timezone,
        config.calendar_cache_path.clone(),
    );

    (Arc::new(AppState { config, calendar }), dir)
}

/// A 302 login response whose URL fragment carries the token.
pub fn login_redirect(token: &str, expires_in: i64) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header(
        "location",
        format!(
            "https://skolae.example/#access_token={token}&token_type=bearer&expires_in={expires_in}"
        )
        .as_str(),
    )
}

/// A one-event agenda body in the upstream's envelope shape.
pub fn agenda_body() -> serde_json::Value {
    serde_json::json!({
        "result": [
            {
                "name": "Rust programming",
                "teacher": "John Doe",
                "start_date": 1_718_262_000_000i64,
                "end_date": 1_718_272_800_000i64,
                "rooms": [{ "name": "A101", "campus": "Main" }]
            }
        ]
    })
}
