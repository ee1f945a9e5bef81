use super::actor::{WeekCalendarActor, WeekCalendarActorHandle};
use super::models::{ProjectedEvent, WeekView};
use super::source::{EventSource, HttpEventSource};
use crate::config::Config;
use crate::error::CalendarResult;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for interacting with the week calendar actor
#[derive(Clone)]
pub struct WeekCalendarHandle {
    actor_handle: WeekCalendarActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl WeekCalendarHandle {
    /// Create a handle backed by the configured HTTP endpoint
    pub fn new(config: &Config) -> CalendarResult<Self> {
        let source = HttpEventSource::from_config(config)?;
        Self::with_source(config, Arc::new(source))
    }

    /// Create a handle with any event source and spawn the actor.
    /// The first load for the current week starts right away.
    pub fn with_source(config: &Config, source: Arc<dyn EventSource>) -> CalendarResult<Self> {
        let zone = config.display_zone()?;

        // Create the actor and get its handle
        let (mut actor, handle) = WeekCalendarActor::new(source, zone, &config.locale);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Ok(Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        })
    }

    /// Show the current week
    pub async fn go_to_today(&self) -> CalendarResult<()> {
        self.actor_handle.go_to_today().await
    }

    /// Show the previous week
    pub async fn previous_week(&self) -> CalendarResult<()> {
        self.actor_handle.previous_week().await
    }

    /// Show the next week
    pub async fn next_week(&self) -> CalendarResult<()> {
        self.actor_handle.next_week().await
    }

    /// Current snapshot, possibly still loading
    pub async fn view(&self) -> CalendarResult<WeekView> {
        self.actor_handle.view().await
    }

    /// Snapshot taken once the latest load has finished
    pub async fn settled(&self) -> CalendarResult<WeekView> {
        self.actor_handle.settled().await
    }

    /// Events starting in a cell
    pub async fn events_for_cell(
        &self,
        day: usize,
        hour: u32,
        half: u32,
    ) -> CalendarResult<Vec<ProjectedEvent>> {
        self.actor_handle.events_for_cell(day, hour, half).await
    }

    /// Whether a column is the current date
    pub async fn is_today(&self, day_index: usize) -> CalendarResult<bool> {
        self.actor_handle.is_today(day_index).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> CalendarResult<()> {
        self.actor_handle.shutdown().await
    }
}
