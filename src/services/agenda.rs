// SPDX-License-Identifier: MIT

//! Kordis agenda API client.

use crate::error::AppError;
use crate::models::{AgendaEvent, AgendaResponse};
use crate::time_utils::DateWindow;

const DEFAULT_API_BASE_URL: &str = "https://api.kordis.fr";

/// Agenda API client.
#[derive(Clone)]
pub struct AgendaClient {
    http: reqwest::Client,
    base_url: String,
}

impl AgendaClient {
    /// Create a client against the production API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL.to_string())
    }

    /// Create a client against an alternative base URL (tests).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetch the scheduled events inside `window`.
    ///
    /// Any non-2xx response surfaces untouched; retry cadence belongs to
    /// the caller's schedule, not this client.
    pub async fn fetch_events(
        &self,
        access_token: &str,
        window: DateWindow,
    ) -> Result<Vec<AgendaEvent>, AppError> {
        let url = format!("{}/me/agenda", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("start", window.start_ms.to_string()),
                ("end", window.end_ms.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::AgendaApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AgendaApi(format!("HTTP {status}: {body}")));
        }

        let agenda: AgendaResponse = response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("malformed agenda response: {e}")))?;

        Ok(agenda.result)
    }
}

impl Default for AgendaClient {
    fn default() -> Self {
        Self::new()
    }
}
