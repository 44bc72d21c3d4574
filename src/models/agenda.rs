// SPDX-License-Identifier: MIT

//! Agenda records as returned by the Kordis API.
//!
//! Upstream data is untrusted: any field may be absent, so everything
//! is defaulted instead of assumed present.

use serde::{Deserialize, Serialize};

/// Response envelope of the agenda endpoint.
///
/// The event list lives in `result`; a body without it is malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaResponse {
    pub result: Vec<AgendaEvent>,
}

/// A single scheduled event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgendaEvent {
    /// Course or activity name
    #[serde(default)]
    pub name: String,
    /// Teacher name (free text, may be empty)
    #[serde(default)]
    pub teacher: String,
    /// Start instant, milliseconds since epoch
    #[serde(default)]
    pub start_date: i64,
    /// End instant, milliseconds since epoch
    #[serde(default)]
    pub end_date: i64,
    /// Rooms the event takes place in (often a single one, may be empty)
    #[serde(default)]
    pub rooms: Vec<Room>,
}

/// A room attached to an event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Room {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub campus: Option<String>,
}
