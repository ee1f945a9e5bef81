use chrono::NaiveDate;
use mockito::Matcher;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use weekgrid::components::week_calendar::{
    EventProjector, EventSource, HttpEventSource, LoadStatus, WeekCalendarHandle,
};
use weekgrid::components::week_calendar::time::DisplayZone;
use weekgrid::config::Config;
use weekgrid::error::Error;

const WEEK_PATH: &str = "/agenda/api/week/";

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

fn config_for(server: &mockito::Server) -> Config {
    let mut config = Config::new(format!("{}{}", server.url(), WEEK_PATH));
    config.timezone = Some("America/Sao_Paulo".to_string());
    config.fetch_timeout_secs = 5;
    config
}

#[tokio::test]
async fn test_fetch_week_sends_week_start_and_cookie() {
    let mut server = mockito::Server::new_async().await;
    let body = r#"{
        "week_start": "2024-06-03",
        "week_end": "2024-06-09",
        "events": [
            {"id": "0b6c1f0e-5d55-4c8e-9d52-1f8a4a0d7b11", "title": "Consulta",
             "start": "2024-06-03T09:15:00-03:00", "end": "2024-06-03T10:00:00-03:00",
             "confirmed": true, "client": "Ana", "location": "Sala 2",
             "day": "2024-06-03", "origem": "agenda"}
        ]
    }"#;
    let mock = server
        .mock("GET", WEEK_PATH)
        .match_query(Matcher::UrlEncoded("week_start".into(), "2024-06-03".into()))
        .match_header("cookie", "sessionid=abc123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let mut config = config_for(&server);
    config.session_cookie = Some("sessionid=abc123".to_string());
    let source = HttpEventSource::from_config(&config).unwrap();

    let events = source.fetch_week(monday()).await.unwrap();
    mock.assert_async().await;

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].client_name(), Some("Ana"));
    assert_eq!(events[0].origin.as_deref(), Some("agenda"));

    // Nine fifteen in Sao Paulo lands in Monday's 09:00 slot for 2 cells
    let projector = EventProjector::new(config.display_zone().unwrap());
    let projected = projector.project(&events);
    assert_eq!(projected[0].day, 0);
    assert_eq!((projected[0].start_hour, projected[0].start_half), (9, 0));
    assert_eq!(projected[0].cell_span, 2);
    assert_eq!(projected[0].time_label, "09:15 – 10:00");
    assert_eq!(projected[0].tooltip, "Consulta — Ana (09:15 – 10:00)");
}

#[tokio::test]
async fn test_fetch_week_without_cookie() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", WEEK_PATH)
        .match_query(Matcher::Any)
        .match_header("cookie", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"events": []}"#)
        .create_async()
        .await;

    let source = HttpEventSource::from_config(&config_for(&server)).unwrap();
    assert!(source.fetch_week(monday()).await.unwrap().is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_week_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", WEEK_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let source = HttpEventSource::from_config(&config_for(&server)).unwrap();
    let result = source.fetch_week(monday()).await;

    assert!(matches!(result, Err(Error::HttpStatus { status: 500 })));
}

#[tokio::test]
async fn test_fetch_week_invalid_json() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", WEEK_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>login</html>")
        .create_async()
        .await;

    let source = HttpEventSource::from_config(&config_for(&server)).unwrap();
    let result = source.fetch_week(monday()).await;

    assert!(matches!(result, Err(Error::Fetch(_))));
}

#[tokio::test]
async fn test_fetch_week_without_events_field() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", WEEK_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"week_start": "2024-06-03", "week_end": "2024-06-09"}"#)
        .create_async()
        .await;

    let source = HttpEventSource::from_config(&config_for(&server)).unwrap();
    assert!(source.fetch_week(monday()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_handle_reports_server_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", WEEK_PATH)
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let config = config_for(&server);
    let source = HttpEventSource::from_config(&config).unwrap();
    let handle = WeekCalendarHandle::with_source(&config, Arc::new(source)).unwrap();

    let view = handle.settled().await.unwrap();
    assert!(!view.loading);
    assert!(view.events.is_empty());
    assert!(matches!(view.status, LoadStatus::Failed { .. }));
    assert_eq!(
        view.week_start,
        weekgrid::components::week_calendar::time::week_start_for(
            DisplayZone::named("America/Sao_Paulo").unwrap().today()
        )
    );

    handle.shutdown().await.unwrap();
}

/// Accept connections and never answer them
async fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{}{}", address, WEEK_PATH)
}

#[tokio::test]
async fn test_fetch_week_times_out() {
    let mut config = Config::new(silent_server().await);
    config.fetch_timeout_secs = 1;
    let source = HttpEventSource::from_config(&config).unwrap();

    let started = Instant::now();
    let result = source.fetch_week(monday()).await;

    assert!(matches!(result, Err(Error::Fetch(_))));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_handle_reports_timeout_as_failed_load() {
    let mut config = Config::new(silent_server().await);
    config.timezone = Some("UTC".to_string());
    config.fetch_timeout_secs = 1;
    let source = HttpEventSource::from_config(&config).unwrap();
    let handle = WeekCalendarHandle::with_source(&config, Arc::new(source)).unwrap();

    let view = tokio::time::timeout(Duration::from_secs(10), handle.settled())
        .await
        .unwrap()
        .unwrap();

    assert!(!view.loading);
    assert!(view.events.is_empty());
    assert!(matches!(view.status, LoadStatus::Failed { .. }));

    handle.shutdown().await.unwrap();
}
