// SPDX-License-Identifier: MIT

//! The refresh pipeline and the on-disk calendar cache.
//!
//! Refresh = authenticate, compute the date window, fetch, encode,
//! publish. Publishing is atomic: a reader racing a refresh sees either
//! the previous complete document or the new one, never a torn file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use chrono_tz::Tz;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::services::{ics, AgendaClient, AuthService};
use crate::time_utils;

/// High-level calendar service: owns the whole refresh pipeline and the
/// cache file.
pub struct CalendarService {
    auth: AuthService,
    agenda: AgendaClient,
    timezone: Tz,
    cache_path: PathBuf,
    /// Serializes concurrent refresh triggers (timer tick vs. request).
    refresh_lock: Mutex<()>,
}

impl CalendarService {
    pub fn new(
        auth: AuthService,
        agenda: AgendaClient,
        timezone: Tz,
        cache_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            auth,
            agenda,
            timezone,
            cache_path: cache_path.into(),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Run the full refresh pipeline and publish the result.
    ///
    /// Returns the freshly encoded document. Errors escape to the
    /// trigger; nothing is retried here.
    pub async fn refresh(&self) -> Result<String, AppError> {
        let _guard = self.refresh_lock.lock().await;

        let access_token = self.auth.obtain_token().await?;

        let window = time_utils::month_window(Utc::now().with_timezone(&self.timezone))?;
        let events = self.agenda.fetch_events(&access_token, window).await?;
        tracing::info!(
            events = events.len(),
            start_ms = window.start_ms,
            end_ms = window.end_ms,
            "Fetched agenda"
        );

        let calendar_ics = ics::encode(&events, self.timezone, Utc::now())?;
        publish(&self.cache_path, &calendar_ics).await?;
        tracing::info!(path = %self.cache_path.display(), "Updated calendar cache");

        Ok(calendar_ics)
    }

    /// Read and validate the cached document, `None` when no cache file
    /// exists yet.
    pub async fn read_cached(&self) -> Result<Option<String>, AppError> {
        match tokio::fs::read_to_string(&self.cache_path).await {
            Ok(contents) => Ok(Some(ics::decode(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The serving path: cached document if present, otherwise a
    /// synchronous refresh.
    pub async fn serve(&self) -> Result<String, AppError> {
        if let Some(cached) = self.read_cached().await? {
            return Ok(cached);
        }
        self.refresh().await
    }
}

/// Atomically replace `path` with `contents`.
///
/// Writes a sibling temp file and renames it into place; rename within
/// one directory is the single atomic publish step.
pub async fn publish(path: &Path, contents: &str) -> Result<(), AppError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
