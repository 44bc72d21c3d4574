// SPDX-License-Identifier: MIT

//! The calendar feed endpoint.

use crate::error::Result;
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/calendar", get(get_calendar))
}

/// Serve the cached calendar document, refreshing on demand when no
/// cache exists yet.
async fn get_calendar(State(state): State<Arc<AppState>>) -> Result<Response> {
    let calendar_ics = state.calendar.serve().await?;
    tracing::info!("Served calendar");

    Ok(([(header::CONTENT_TYPE, "text/calendar")], calendar_ics).into_response())
}
