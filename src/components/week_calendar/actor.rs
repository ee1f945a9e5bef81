use super::models::{LoadTicket, ProjectedEvent, RawEvent, WeekView};
use super::projector::EventProjector;
use super::source::EventSource;
use super::state::WeekState;
use super::time::DisplayZone;
use crate::error::{calendar_error, CalendarResult};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The week calendar actor that owns the state and runs fetches
pub struct WeekCalendarActor {
    state: WeekState,
    zone: DisplayZone,
    projector: EventProjector,
    source: Arc<dyn EventSource>,
    command_rx: mpsc::Receiver<WeekCalendarCommand>,
    load_tx: mpsc::Sender<LoadOutcome>,
    load_rx: mpsc::Receiver<LoadOutcome>,
    in_flight: Option<JoinHandle<()>>,
    pending_ticket: Option<LoadTicket>,
    waiters: Vec<mpsc::Sender<WeekView>>,
}

/// Commands that can be sent to the week calendar actor
pub enum WeekCalendarCommand {
    GoToToday,
    PreviousWeek,
    NextWeek,
    GetView(mpsc::Sender<WeekView>),
    WhenSettled(mpsc::Sender<WeekView>),
    EventsForCell {
        day: usize,
        hour: u32,
        half: u32,
        respond_to: mpsc::Sender<Vec<ProjectedEvent>>,
    },
    IsToday(usize, mpsc::Sender<bool>),
    Shutdown,
}

/// Result of a fetch, tagged with the navigation it was issued for
struct LoadOutcome {
    ticket: LoadTicket,
    result: CalendarResult<Vec<RawEvent>>,
}

/// Handle for communicating with the week calendar actor
#[derive(Clone)]
pub struct WeekCalendarActorHandle {
    command_tx: mpsc::Sender<WeekCalendarCommand>,
}

impl WeekCalendarActorHandle {
    async fn send(&self, command: WeekCalendarCommand) -> CalendarResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| calendar_error(&format!("Actor mailbox error: {}", e)))
    }

    async fn request<T: Send>(
        &self,
        make: impl FnOnce(mpsc::Sender<T>) -> WeekCalendarCommand + Send,
    ) -> CalendarResult<T> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.send(make(response_tx)).await?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| calendar_error("Response channel closed"))
    }

    /// Show the current week
    pub async fn go_to_today(&self) -> CalendarResult<()> {
        self.send(WeekCalendarCommand::GoToToday).await
    }

    /// Show the previous week
    pub async fn previous_week(&self) -> CalendarResult<()> {
        self.send(WeekCalendarCommand::PreviousWeek).await
    }

    /// Show the next week
    pub async fn next_week(&self) -> CalendarResult<()> {
        self.send(WeekCalendarCommand::NextWeek).await
    }

    /// Current snapshot, possibly still loading
    pub async fn view(&self) -> CalendarResult<WeekView> {
        self.request(WeekCalendarCommand::GetView).await
    }

    /// Snapshot taken once the latest load has finished
    pub async fn settled(&self) -> CalendarResult<WeekView> {
        self.request(WeekCalendarCommand::WhenSettled).await
    }

    /// Events starting in a cell
    pub async fn events_for_cell(
        &self,
        day: usize,
        hour: u32,
        half: u32,
    ) -> CalendarResult<Vec<ProjectedEvent>> {
        self.request(|respond_to| WeekCalendarCommand::EventsForCell {
            day,
            hour,
            half,
            respond_to,
        })
        .await
    }

    /// Whether a column is the current date
    pub async fn is_today(&self, day_index: usize) -> CalendarResult<bool> {
        self.request(|respond_to| WeekCalendarCommand::IsToday(day_index, respond_to))
            .await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> CalendarResult<()> {
        let _ = self.command_tx.send(WeekCalendarCommand::Shutdown).await;
        Ok(())
    }
}

impl WeekCalendarActor {
    /// Create a new actor and return its handle
    pub fn new(
        source: Arc<dyn EventSource>,
        zone: DisplayZone,
        locale: &str,
    ) -> (Self, WeekCalendarActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (load_tx, load_rx) = mpsc::channel(8);

        let (state, ticket) = WeekState::initialize(zone.today(), locale);

        let actor = Self {
            state,
            zone,
            projector: EventProjector::new(zone),
            source,
            command_rx,
            load_tx,
            load_rx,
            in_flight: None,
            pending_ticket: Some(ticket),
            waiters: Vec::new(),
        };

        let handle = WeekCalendarActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Week calendar actor started");

        if let Some(ticket) = self.pending_ticket.take() {
            self.start_load(ticket);
        }

        loop {
            tokio::select! {
                command = self.command_rx.recv() => {
                    match command {
                        Some(WeekCalendarCommand::Shutdown) | None => {
                            info!("Week calendar actor shutting down");
                            break;
                        }
                        Some(command) => self.handle_command(command).await,
                    }
                }
                Some(outcome) = self.load_rx.recv() => {
                    self.finish_load(outcome).await;
                }
            }
        }

        if let Some(task) = self.in_flight.take() {
            task.abort();
        }

        info!("Week calendar actor shut down");
    }

    async fn handle_command(&mut self, command: WeekCalendarCommand) {
        match command {
            WeekCalendarCommand::GoToToday => {
                let ticket = self.state.go_to_today(self.zone.today());
                self.start_load(ticket);
            }
            WeekCalendarCommand::PreviousWeek => {
                let ticket = self.state.previous_week();
                self.start_load(ticket);
            }
            WeekCalendarCommand::NextWeek => {
                let ticket = self.state.next_week();
                self.start_load(ticket);
            }
            WeekCalendarCommand::GetView(response_tx) => {
                let _ = response_tx.send(self.view()).await;
            }
            WeekCalendarCommand::WhenSettled(response_tx) => {
                if self.state.loading() {
                    self.waiters.push(response_tx);
                } else {
                    let _ = response_tx.send(self.view()).await;
                }
            }
            WeekCalendarCommand::EventsForCell {
                day,
                hour,
                half,
                respond_to,
            } => {
                let _ = respond_to
                    .send(self.state.events_for_cell(day, hour, half))
                    .await;
            }
            WeekCalendarCommand::IsToday(day_index, response_tx) => {
                let _ = response_tx
                    .send(self.state.is_today(day_index, self.zone.today()))
                    .await;
            }
            // Handled by the run loop
            WeekCalendarCommand::Shutdown => {}
        }
    }

    /// Spawn the fetch for a ticket, cancelling the previous one
    fn start_load(&mut self, ticket: LoadTicket) {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        let source = Arc::clone(&self.source);
        let load_tx = self.load_tx.clone();

        self.in_flight = Some(tokio::spawn(async move {
            let result = source.fetch_week(ticket.week_start).await;
            let _ = load_tx.send(LoadOutcome { ticket, result }).await;
        }));
    }

    async fn finish_load(&mut self, outcome: LoadOutcome) {
        let LoadOutcome { ticket, result } = outcome;

        let applied = match result {
            Ok(events) => self.state.apply_loaded(&ticket, events, &self.projector),
            Err(e) => {
                let applied = self.state.apply_failed(&ticket, e.to_string());
                if applied {
                    error!("Failed to load week {}: {}", ticket.week_start, e);
                }
                applied
            }
        };

        if applied {
            self.in_flight = None;
            self.notify_waiters().await;
        }
    }

    async fn notify_waiters(&mut self) {
        if self.waiters.is_empty() {
            return;
        }

        let view = self.view();
        for waiter in self.waiters.drain(..) {
            let _ = waiter.send(view.clone()).await;
        }
    }

    fn view(&self) -> WeekView {
        self.state.view(self.zone.today())
    }
}
