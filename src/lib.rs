// SPDX-License-Identifier: MIT

//! Skolae-iCal: serve a MyGES class schedule as an iCalendar feed.
//!
//! A background task periodically authenticates against the Kordis API,
//! fetches the agenda for about one month forward and publishes it as an
//! `.ics` document; `GET /calendar` serves the cached document to
//! calendar subscribers.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{AgendaClient, AuthClient, AuthService, CalendarService, TokenStore};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub calendar: CalendarService,
}

impl AppState {
    /// Build the service stack against the production Kordis endpoints.
    pub fn new(config: Config) -> Self {
        let auth = AuthService::new(
            AuthClient::new(),
            TokenStore::new(config.token_cache_path.clone()),
            config.username.clone(),
            config.password.clone(),
        );
        let calendar = CalendarService::new(
            auth,
            AgendaClient::new(),
            config.timezone,
            config.calendar_cache_path.clone(),
        );

        Self { config, calendar }
    }
}
