// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod agenda;
pub mod auth;
pub mod calendar;
pub mod ics;

pub use agenda::AgendaClient;
pub use auth::{AuthClient, AuthService, TokenStore};
pub use calendar::CalendarService;
