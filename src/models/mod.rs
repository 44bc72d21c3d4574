// SPDX-License-Identifier: MIT

//! Data models for upstream records and persisted state.

pub mod agenda;
pub mod token;

pub use agenda::{AgendaEvent, AgendaResponse, Room};
pub use token::TokenRecord;
