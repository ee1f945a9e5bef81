use super::models::{ProjectedEvent, RawEvent};
use super::time::{format_clock, parse_timestamp, DisplayZone, SLOT_MILLIS};
use crate::error::CalendarResult;
use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Weekday};
use tracing::warn;

/// Classes for confirmed events, picked by batch position
pub const PALETTE: [&str; 8] = [
    "bg-blue-100 border-blue-500 text-blue-900",
    "bg-green-100 border-green-500 text-green-900",
    "bg-yellow-100 border-yellow-500 text-yellow-900",
    "bg-purple-100 border-purple-500 text-purple-900",
    "bg-pink-100 border-pink-500 text-pink-900",
    "bg-teal-100 border-teal-500 text-teal-900",
    "bg-orange-100 border-orange-500 text-orange-900",
    "bg-indigo-100 border-indigo-500 text-indigo-900",
];

/// Class for events that are not confirmed yet
pub const PENDING_CLASS: &str = "bg-gray-100 border-gray-400 text-gray-600";

/// Places raw events on the week grid of a display zone
#[derive(Debug, Clone, Copy)]
pub struct EventProjector {
    zone: DisplayZone,
}

impl EventProjector {
    pub fn new(zone: DisplayZone) -> Self {
        Self { zone }
    }

    /// Project a whole batch. Output keeps input order; events with
    /// unreadable timestamps are skipped.
    pub fn project(&self, events: &[RawEvent]) -> Vec<ProjectedEvent> {
        match &self.zone {
            DisplayZone::Local => project_events_in(events, &Local),
            DisplayZone::Named(tz) => project_events_in(events, tz),
        }
    }
}

/// Project a batch in an explicit zone
pub fn project_events_in<Z: TimeZone>(events: &[RawEvent], zone: &Z) -> Vec<ProjectedEvent> {
    events
        .iter()
        .enumerate()
        .filter_map(|(index, event)| match project_event(index, event, zone) {
            Ok(projected) => Some(projected),
            Err(e) => {
                warn!(event_id = %event.id, "Skipping event: {}", e);
                None
            }
        })
        .collect()
}

/// Project one event given its position in the batch
pub fn project_event<Z: TimeZone>(
    index: usize,
    event: &RawEvent,
    zone: &Z,
) -> CalendarResult<ProjectedEvent> {
    let start = parse_timestamp(&event.start, zone)?;
    let end = parse_timestamp(&event.end, zone)?;

    let time_label = format!("{} – {}", format_clock(&start), format_clock(&end));
    let client = event.client_name();

    Ok(ProjectedEvent {
        id: event.id.clone(),
        title: event.title.clone(),
        client: client.unwrap_or_default().to_string(),
        location: event.location.clone().unwrap_or_default(),
        day: day_index(start.weekday()),
        start_hour: start.hour(),
        start_half: slot_half(start.minute()),
        cell_span: cell_span(&start, &end),
        tooltip: tooltip(&event.title, client, &time_label),
        time_label,
        color_class: color_class(index, event.confirmed).to_string(),
    })
}

/// Monday-first column index
pub fn day_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

/// Half-hour bucket a minute falls into (not rounded)
pub fn slot_half(minute: u32) -> u32 {
    if minute >= 30 {
        30
    } else {
        0
    }
}

/// Slots covered by an event: duration rounded to the nearest slot, at least one
pub fn cell_span<Z: TimeZone>(start: &DateTime<Z>, end: &DateTime<Z>) -> u32 {
    let millis = end.clone().signed_duration_since(start.clone()).num_milliseconds();
    // Half rounds up, as Math.round does
    let slots = (millis as f64 / SLOT_MILLIS as f64 + 0.5).floor();
    if slots < 1.0 {
        1
    } else {
        slots as u32
    }
}

/// Palette entry for confirmed events, the pending class otherwise
pub fn color_class(index: usize, confirmed: bool) -> &'static str {
    if confirmed {
        PALETTE[index % PALETTE.len()]
    } else {
        PENDING_CLASS
    }
}

/// `title — client (HH:MM – HH:MM)`, the client part only when present
pub fn tooltip(title: &str, client: Option<&str>, time_label: &str) -> String {
    match client {
        Some(client) => format!("{} — {} ({})", title, client, time_label),
        None => format!("{} ({})", title, time_label),
    }
}

/// Events starting exactly in a cell, in batch order
pub fn events_for_cell(
    events: &[ProjectedEvent],
    day: usize,
    hour: u32,
    half: u32,
) -> Vec<ProjectedEvent> {
    events
        .iter()
        .filter(|event| event.starts_in(day, hour, half))
        .cloned()
        .collect()
}
