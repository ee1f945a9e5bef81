use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Event as delivered by the week endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawEvent {
    #[serde(default, deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confirmed: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "origem")]
    pub origin: Option<String>,
}

impl RawEvent {
    /// Client name, `None` when absent or blank
    pub fn client_name(&self) -> Option<&str> {
        self.client.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Ids arrive either as strings (UUIDs) or as plain numbers
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "event id must be a string or a number, got {}",
            other
        ))),
    }
}

/// `null` reads as the field's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One column of the week grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayDescriptor {
    pub label: &'static str,
    pub number: u32,
    pub date: NaiveDate,
}

/// One row of the week grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub hour: u32,
    pub half: u32,
    pub label: String,
}

impl TimeSlot {
    pub fn new(hour: u32, half: u32) -> Self {
        Self {
            hour,
            half,
            label: format!("{:02}:{:02}", hour, half),
        }
    }
}

/// Event placed on the grid, ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedEvent {
    pub id: String,
    pub title: String,
    pub client: String,
    pub location: String,
    /// Column, 0 = Monday .. 6 = Sunday
    pub day: usize,
    pub start_hour: u32,
    /// 0 or 30
    pub start_half: u32,
    /// Number of consecutive slots, at least 1
    pub cell_span: u32,
    pub time_label: String,
    pub tooltip: String,
    pub color_class: String,
}

impl ProjectedEvent {
    /// Whether the event starts in the given cell
    pub fn starts_in(&self, day: usize, hour: u32, half: u32) -> bool {
        self.day == day && self.start_hour == hour && self.start_half == half
    }
}

/// Outcome of the latest load for the displayed week
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed { reason: String },
}

/// Identifies the navigation a fetch was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub week_start: NaiveDate,
}

/// Snapshot of everything the rendering layer consumes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekView {
    pub week_start: NaiveDate,
    pub week_label: String,
    pub days: Vec<DayDescriptor>,
    pub time_slots: Vec<TimeSlot>,
    pub loading: bool,
    pub status: LoadStatus,
    pub events: Vec<ProjectedEvent>,
    /// Column of the current date, when it falls inside this week
    pub today_index: Option<usize>,
}

impl WeekView {
    /// Events starting in a cell, in batch order
    pub fn events_for_cell(&self, day: usize, hour: u32, half: u32) -> Vec<&ProjectedEvent> {
        self.events
            .iter()
            .filter(|event| event.starts_in(day, hour, half))
            .collect()
    }
}
