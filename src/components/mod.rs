// Export components
pub mod week_calendar;

// Re-export the week calendar handle
pub use week_calendar::WeekCalendarHandle;
