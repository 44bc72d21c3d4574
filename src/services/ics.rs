// SPDX-License-Identifier: MIT

//! iCalendar codec: agenda events in, RFC 5545 text out.
//!
//! `encode` builds the full VCALENDAR document; `decode` is a
//! parse-then-reserialize validity check applied to cached documents
//! before they are served.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, Property};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{AgendaEvent, Room};

const PRODID: &str = "-//skolae-ical//EN";

const NO_CAMPUS: &str = "No campus";
const NO_ROOM: &str = "No room";

/// Encode `events` as an iCalendar document.
///
/// Every event becomes exactly one VEVENT. Uids are freshly generated on
/// each encode, so two encodes of the same input differ at the uid level
/// while carrying identical visible content.
pub fn encode(events: &[AgendaEvent], tz: Tz, now: DateTime<Utc>) -> Result<String, AppError> {
    let mut cal = Calendar::new();
    let stamp = now.format("%Y%m%dT%H%M%SZ").to_string();

    for event in events {
        let mut vevent = icalendar::Event::new();
        vevent.uid(&Uuid::new_v4().to_string());
        vevent.summary(&event.name);
        vevent.description(&build_description(event));
        vevent.add_property("DTSTAMP", &stamp);
        vevent.add_property("CREATED", &stamp);
        add_zoned_property(&mut vevent, "DTSTART", event.start_date, tz)?;
        add_zoned_property(&mut vevent, "DTEND", event.end_date, tz)?;
        cal.push(vevent.done());
    }

    Ok(set_prodid(&cal.done().to_string()))
}

/// Parse an iCalendar document and re-serialize it.
///
/// Used as a validity gate before serving cached bytes; malformed input
/// fails instead of producing partial output.
pub fn decode(input: &str) -> Result<String, AppError> {
    let calendar: Calendar = input.parse().map_err(AppError::Parse)?;
    Ok(set_prodid(&calendar.to_string()))
}

/// Derive the three-line event description: campuses, rooms, teacher.
fn build_description(event: &AgendaEvent) -> String {
    let campuses = join_unique(&event.rooms, |room| room.campus.as_deref(), NO_CAMPUS);
    let rooms = join_unique(&event.rooms, |room| room.name.as_deref(), NO_ROOM);
    format!("{campuses}\n{rooms}\n{}", event.teacher)
}

/// De-duplicated, comma-joined field values across `rooms`.
///
/// The placeholder applies only to an empty room list; rooms that merely
/// lack the field yield an empty line.
fn join_unique<'a>(
    rooms: &'a [Room],
    field: impl Fn(&'a Room) -> Option<&'a str>,
    placeholder: &str,
) -> String {
    if rooms.is_empty() {
        return placeholder.to_string();
    }

    let unique: BTreeSet<&str> = rooms
        .iter()
        .filter_map(field)
        .filter(|value| !value.is_empty())
        .collect();

    unique.into_iter().collect::<Vec<_>>().join(", ")
}

/// Emit a local-time datetime property qualified with a TZID parameter.
fn add_zoned_property(
    vevent: &mut icalendar::Event,
    name: &str,
    epoch_ms: i64,
    tz: Tz,
) -> Result<(), AppError> {
    let instant = DateTime::from_timestamp_millis(epoch_ms)
        .ok_or_else(|| AppError::Parse(format!("timestamp {epoch_ms} out of range")))?;
    let local = instant.with_timezone(&tz);

    let mut prop = Property::new(name, local.format("%Y%m%dT%H%M%S").to_string());
    prop.add_parameter("TZID", tz.name());
    vevent.append_property(prop);
    Ok(())
}

/// Rewrite the PRODID line emitted by the icalendar crate with ours.
///
/// Only the first PRODID is kept; a parsed-then-reserialized document
/// must not end up with two.
fn set_prodid(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    let mut seen_prodid = false;

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            if seen_prodid {
                continue;
            }
            seen_prodid = true;
            result.push_str("PRODID:");
            result.push_str(PRODID);
        } else {
            result.push_str(line);
        }
        result.push_str("\r\n");
    }

    result
}
