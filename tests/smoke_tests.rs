use chrono::NaiveDate;
use std::collections::HashMap;
use weekgrid::components::week_calendar::{LoadStatus, WeekState};
use weekgrid::config::{Config, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_LOCALE};

/// Smoke test to verify that a config can be built from variables
#[test]
fn test_config_from_vars() {
    let vars: HashMap<String, String> = [
        ("EVENTS_ENDPOINT", "http://127.0.0.1:8000/agenda/api/week/"),
        ("TIMEZONE", "America/Sao_Paulo"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let config = Config::from_vars(&vars).unwrap();

    assert_eq!(config.events_endpoint, "http://127.0.0.1:8000/agenda/api/week/");
    assert_eq!(config.timezone.as_deref(), Some("America/Sao_Paulo"));
    assert_eq!(config.locale, DEFAULT_LOCALE);
    assert_eq!(config.fetch_timeout_secs, DEFAULT_FETCH_TIMEOUT_SECS);
    assert!(config.validate().is_ok());
}

/// Smoke test for a freshly initialized week
#[test]
fn test_week_state_initializes_loading() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
    let (state, ticket) = WeekState::initialize(today, "pt-BR");

    assert_eq!(ticket.week_start, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    assert_eq!(state.days().len(), 7);
    assert_eq!(state.time_slots().len(), 32);
    assert!(state.loading());
    assert_eq!(state.status(), &LoadStatus::Loading);
    assert!(state.is_today(2, today));
}
