use super::models::{
    DayDescriptor, LoadStatus, LoadTicket, ProjectedEvent, RawEvent, TimeSlot, WeekView,
};
use super::projector::{events_for_cell, EventProjector};
use super::time::{shift_weeks, time_slots, week_days, week_label, week_start_for};
use chrono::NaiveDate;
use tracing::{debug, info};

/// State of the displayed week.
///
/// Navigation recomputes the days and label synchronously and hands back a
/// [`LoadTicket`]. Load results are only accepted for the latest ticket, so a
/// slow response for a week the user already left never overwrites newer
/// state.
#[derive(Debug, Clone)]
pub struct WeekState {
    week_start: NaiveDate,
    days: Vec<DayDescriptor>,
    time_slots: Vec<TimeSlot>,
    week_label: String,
    locale: String,
    raw_events: Vec<RawEvent>,
    processed_events: Vec<ProjectedEvent>,
    status: LoadStatus,
    generation: u64,
}

impl WeekState {
    /// Build the time slots and move to the week containing `today`
    pub fn initialize(today: NaiveDate, locale: impl Into<String>) -> (Self, LoadTicket) {
        let week_start = week_start_for(today);
        let mut state = Self {
            week_start,
            days: Vec::new(),
            time_slots: time_slots(),
            week_label: String::new(),
            locale: locale.into(),
            raw_events: Vec::new(),
            processed_events: Vec::new(),
            status: LoadStatus::Loading,
            generation: 0,
        };
        let ticket = state.go_to_today(today);
        (state, ticket)
    }

    /// Show the week containing `today`
    pub fn go_to_today(&mut self, today: NaiveDate) -> LoadTicket {
        self.set_week(week_start_for(today))
    }

    /// Show the week before the current one
    pub fn previous_week(&mut self) -> LoadTicket {
        self.set_week(shift_weeks(self.week_start, -1))
    }

    /// Show the week after the current one
    pub fn next_week(&mut self) -> LoadTicket {
        self.set_week(shift_weeks(self.week_start, 1))
    }

    fn set_week(&mut self, week_start: NaiveDate) -> LoadTicket {
        self.week_start = week_start;
        self.days = week_days(week_start);
        self.week_label = week_label(week_start, &self.locale);
        self.status = LoadStatus::Loading;
        self.generation += 1;

        info!("Showing week {} ({})", week_start, self.week_label);

        LoadTicket {
            generation: self.generation,
            week_start,
        }
    }

    /// Whether `ticket` belongs to the latest navigation
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation && ticket.week_start == self.week_start
    }

    /// Store a successful load. Returns false when the ticket is stale.
    pub fn apply_loaded(
        &mut self,
        ticket: &LoadTicket,
        events: Vec<RawEvent>,
        projector: &EventProjector,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "Discarding {} events for stale week {}",
                events.len(),
                ticket.week_start
            );
            return false;
        }

        self.processed_events = projector.project(&events);
        self.raw_events = events;
        self.status = LoadStatus::Ready;

        info!(
            "Week {}: {} events received, {} placed",
            self.week_start,
            self.raw_events.len(),
            self.processed_events.len()
        );
        true
    }

    /// Clear the events after a failed load. Returns false when the ticket is stale.
    pub fn apply_failed(&mut self, ticket: &LoadTicket, reason: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            debug!("Discarding failure for stale week {}", ticket.week_start);
            return false;
        }

        self.raw_events.clear();
        self.processed_events.clear();
        self.status = LoadStatus::Failed {
            reason: reason.into(),
        };
        true
    }

    /// Whether the day at `day_index` is `today`
    pub fn is_today(&self, day_index: usize, today: NaiveDate) -> bool {
        self.days
            .get(day_index)
            .map(|day| day.date == today)
            .unwrap_or(false)
    }

    /// Events starting in a cell, in batch order
    pub fn events_for_cell(&self, day: usize, hour: u32, half: u32) -> Vec<ProjectedEvent> {
        events_for_cell(&self.processed_events, day, hour, half)
    }

    pub fn loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    pub fn days(&self) -> &[DayDescriptor] {
        &self.days
    }

    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.time_slots
    }

    pub fn week_label(&self) -> &str {
        &self.week_label
    }

    pub fn raw_events(&self) -> &[RawEvent] {
        &self.raw_events
    }

    pub fn processed_events(&self) -> &[ProjectedEvent] {
        &self.processed_events
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Snapshot for the rendering layer
    pub fn view(&self, today: NaiveDate) -> WeekView {
        WeekView {
            week_start: self.week_start,
            week_label: self.week_label.clone(),
            days: self.days.clone(),
            time_slots: self.time_slots.clone(),
            loading: self.loading(),
            status: self.status.clone(),
            events: self.processed_events.clone(),
            today_index: (0..self.days.len()).find(|&i| self.is_today(i, today)),
        }
    }
}
