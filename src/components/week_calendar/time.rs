use super::models::{DayDescriptor, TimeSlot};
use crate::error::{config_error, timestamp_error, CalendarResult};
use chrono::{
    DateTime, Datelike, Duration, Local, Locale, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;

/// First visible hour of the grid
pub const HOUR_START: u32 = 7;
/// Last visible hour of the grid (its :30 slot is the final one)
pub const HOUR_END: u32 = 22;
/// Length of one slot in milliseconds
pub const SLOT_MILLIS: i64 = 30 * 60 * 1000;

/// Day abbreviations, Monday first
pub const DAY_LABELS: [&str; 7] = ["Seg", "Ter", "Qua", "Qui", "Sex", "Sáb", "Dom"];

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_MINUTES_FORMAT: &str = "%Y-%m-%dT%H:%M%:z";

/// Zone in which "today" is computed and events are placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    /// The host's local zone
    Local,
    /// A named IANA zone
    Named(Tz),
}

impl DisplayZone {
    /// Parse an IANA zone name such as `America/Sao_Paulo`
    pub fn named(name: &str) -> CalendarResult<Self> {
        name.parse::<Tz>()
            .map(DisplayZone::Named)
            .map_err(|_| config_error(&format!("Unknown timezone: {}", name)))
    }

    /// Current calendar date in this zone
    pub fn today(&self) -> NaiveDate {
        match self {
            DisplayZone::Local => Local::now().date_naive(),
            DisplayZone::Named(tz) => Utc::now().with_timezone(tz).date_naive(),
        }
    }
}

/// Monday of the week containing `date`
pub fn week_start_for(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as i64;
    date.checked_sub_signed(Duration::days(offset))
        .unwrap_or(date)
}

/// Move a week start by a number of weeks
pub fn shift_weeks(week_start: NaiveDate, weeks: i64) -> NaiveDate {
    week_start
        .checked_add_signed(Duration::days(7 * weeks))
        .unwrap_or(week_start)
}

/// The seven day descriptors of the week starting at `week_start`
pub fn week_days(week_start: NaiveDate) -> Vec<DayDescriptor> {
    week_start
        .iter_days()
        .zip(DAY_LABELS)
        .map(|(date, label)| DayDescriptor {
            label,
            number: date.day(),
            date,
        })
        .collect()
}

/// Every visible half-hour slot, 07:00 through 22:30
pub fn time_slots() -> Vec<TimeSlot> {
    (HOUR_START..=HOUR_END)
        .flat_map(|hour| [0, 30].map(|half| TimeSlot::new(hour, half)))
        .collect()
}

/// Format a week start for the `week_start` query parameter
pub fn format_week_param(week_start: NaiveDate) -> String {
    week_start.format("%Y-%m-%d").to_string()
}

/// Short label covering Monday through Sunday, e.g. `03 jun — 09 jun`
pub fn week_label(week_start: NaiveDate, locale: &str) -> String {
    let locale = chrono_locale(locale);
    let week_end = shift_days(week_start, 6);
    format!(
        "{} — {}",
        short_date(week_start, locale),
        short_date(week_end, locale)
    )
}

/// Parse an ISO-8601 event timestamp into `zone`.
///
/// Timestamps with an offset are instants and get converted. Timestamps
/// without one are wall-clock times in `zone`; a time that falls in a DST gap
/// moves forward by an hour.
pub fn parse_timestamp<Z: TimeZone>(value: &str, zone: &Z) -> CalendarResult<DateTime<Z>> {
    let value = value.trim();

    // RFC 3339 requires seconds; ISO-8601 also allows `HH:MM` before the offset
    if let Ok(instant) = DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, OFFSET_MINUTES_FORMAT))
    {
        return Ok(instant.with_timezone(zone));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| timestamp_error(value))?;

    zone.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            zone.from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
        })
        .ok_or_else(|| timestamp_error(&format!("{} does not exist in the display zone", value)))
}

/// Zero-padded `HH:MM` of a date-time
pub fn format_clock<Z: TimeZone>(value: &DateTime<Z>) -> String {
    format!("{:02}:{:02}", value.hour(), value.minute())
}

fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

fn chrono_locale(locale: &str) -> Locale {
    Locale::try_from(locale.replace('-', "_").as_str()).unwrap_or(Locale::POSIX)
}

fn short_date(date: NaiveDate, locale: Locale) -> String {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .format_localized("%d %b", locale)
        .to_string()
}
