use crate::components::week_calendar::time::HOUR_START;
use crate::components::week_calendar::{LoadStatus, ProjectedEvent, WeekView};
use rust_i18n::t;
use std::fmt::Write;

const CELL_WIDTH: usize = 12;
const LABEL_WIDTH: usize = 6;
const CONTINUATION: &str = " ..";

/// Row of the grid where a start time falls, if it is visible
pub fn slot_index(view: &WeekView, hour: u32, half: u32) -> Option<usize> {
    if hour < HOUR_START {
        return None;
    }
    let index = ((hour - HOUR_START) * 2 + half / 30) as usize;
    (index < view.time_slots.len()).then_some(index)
}

/// One line describing the load state of the week
pub fn render_status(view: &WeekView) -> String {
    match &view.status {
        LoadStatus::Loading => t!("status.loading").to_string(),
        LoadStatus::Failed { reason } => t!("status.failed", reason = reason).to_string(),
        LoadStatus::Ready if view.events.is_empty() => t!("status.empty").to_string(),
        LoadStatus::Ready => t!("status.ready", count = view.events.len()).to_string(),
    }
}

/// Plain-text week grid, one row per time slot
pub fn render_grid(view: &WeekView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  ({})", view.week_label, render_status(view));

    // Header
    let _ = write!(out, "{:<LABEL_WIDTH$}", "");
    for (index, day) in view.days.iter().enumerate() {
        let marker = if view.today_index == Some(index) { "*" } else { " " };
        let header = format!("{}{} {:02}", marker, day.label, day.number);
        let _ = write!(out, "|{}", fit(&header));
    }
    out.push_str("|\n");

    // Rows: which event starts in, or continues through, each cell
    let mut starts: Vec<Vec<Option<&ProjectedEvent>>> =
        vec![vec![None; view.days.len()]; view.time_slots.len()];
    let mut covered = vec![vec![false; view.days.len()]; view.time_slots.len()];

    for event in &view.events {
        let Some(row) = slot_index(view, event.start_hour, event.start_half) else {
            continue;
        };
        if event.day >= view.days.len() {
            continue;
        }
        if starts[row][event.day].is_none() {
            starts[row][event.day] = Some(event);
        }
        let last = (row + event.cell_span as usize).min(view.time_slots.len());
        for cell in covered.iter_mut().take(last).skip(row + 1) {
            cell[event.day] = true;
        }
    }

    for (row, slot) in view.time_slots.iter().enumerate() {
        let _ = write!(out, "{:<LABEL_WIDTH$}", slot.label);
        for day in 0..view.days.len() {
            let cell = match starts[row][day] {
                Some(event) => {
                    let extra = view.events_for_cell(day, slot.hour, slot.half).len();
                    if extra > 1 {
                        format!(" {} +{}", event.title, extra - 1)
                    } else {
                        format!(" {}", event.title)
                    }
                }
                None if covered[row][day] => CONTINUATION.to_string(),
                None => String::new(),
            };
            let _ = write!(out, "|{}", fit(&cell));
        }
        out.push_str("|\n");
    }

    out
}

/// Events listed per day, in batch order
pub fn render_agenda(view: &WeekView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  ({})", view.week_label, render_status(view));

    for (index, day) in view.days.iter().enumerate() {
        let _ = writeln!(out, "{} {:02}", day.label, day.number);
        for event in view.events.iter().filter(|event| event.day == index) {
            let _ = writeln!(out, "  {}", describe(event));
        }
    }

    out
}

/// Events starting in one cell
pub fn render_cell(events: &[ProjectedEvent]) -> String {
    if events.is_empty() {
        return format!("{}\n", t!("cell.empty"));
    }

    let mut out = String::new();
    for event in events {
        let _ = writeln!(out, "{}", describe(event));
    }
    out
}

fn describe(event: &ProjectedEvent) -> String {
    let mut line = event.tooltip.clone();
    if !event.location.is_empty() {
        let _ = write!(line, " @ {}", event.location);
    }
    line
}

fn fit(text: &str) -> String {
    let clipped: String = text.chars().take(CELL_WIDTH).collect();
    format!("{:<CELL_WIDTH$}", clipped)
}
