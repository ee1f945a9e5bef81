mod actor;
mod handle;
pub mod models;
pub mod projector;
pub mod source;
pub mod state;
pub mod time;

pub use handle::WeekCalendarHandle;
pub use models::{DayDescriptor, LoadStatus, LoadTicket, ProjectedEvent, RawEvent, TimeSlot, WeekView};
pub use projector::EventProjector;
pub use source::{EventSource, HttpEventSource};
pub use state::WeekState;
pub use time::DisplayZone;
