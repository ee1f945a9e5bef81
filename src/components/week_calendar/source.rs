use super::models::RawEvent;
use super::time::format_week_param;
use crate::config::Config;
use crate::error::{config_error, fetch_error, CalendarResult, Error};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{header, Client};
use tracing::{debug, warn};
use url::Url;

/// Anything that can supply the events of one week
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch the raw events of the week starting at `week_start`
    async fn fetch_week(&self, week_start: NaiveDate) -> CalendarResult<Vec<RawEvent>>;
}

/// Week events endpoint reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpEventSource {
    client: Client,
    endpoint: Url,
    session_cookie: Option<String>,
}

impl HttpEventSource {
    /// Build a source from the configuration
    pub fn from_config(config: &Config) -> CalendarResult<Self> {
        let endpoint = Url::parse(&config.events_endpoint)
            .map_err(|e| config_error(&format!("Invalid events endpoint: {}", e)))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.fetch_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| config_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            session_cookie: config.session_cookie.clone(),
        })
    }

    /// URL requested for a week
    pub fn week_url(&self, week_start: NaiveDate) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("week_start", &format_week_param(week_start));
        url
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn fetch_week(&self, week_start: NaiveDate) -> CalendarResult<Vec<RawEvent>> {
        let url = self.week_url(week_start);
        debug!("Fetching events from {}", url);

        let mut request = self.client.get(url).header(header::ACCEPT, "application/json");
        if let Some(cookie) = &self.session_cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request
            .send()
            .await
            .map_err(|e| fetch_error(&format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| fetch_error(&format!("Failed to parse events response: {}", e)))?;

        Ok(extract_events(&body))
    }
}

/// Pull the `events` array out of a response body.
///
/// An absent or non-array `events` field is an empty week. Every entry keeps
/// its position so palette colours follow the batch index. An entry that does
/// not look like an event becomes an empty placeholder, which the projector
/// skips.
pub fn extract_events(body: &serde_json::Value) -> Vec<RawEvent> {
    let Some(items) = body.get("events").and_then(|events| events.as_array()) else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| match serde_json::from_value::<RawEvent>(item.clone()) {
            Ok(event) => event,
            Err(e) => {
                warn!("Malformed event entry: {}", e);
                RawEvent {
                    id: item
                        .get("id")
                        .and_then(|id| id.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    ..Default::default()
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::week_calendar::projector::{
        project_events_in, PALETTE, PENDING_CLASS,
    };
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_extract_events() {
        let body = json!({
            "week_start": "2024-06-03",
            "week_end": "2024-06-09",
            "events": [
                {"id": "a", "title": "Consulta", "start": "2024-06-03T09:15:00",
                 "end": "2024-06-03T10:00:00", "confirmed": true, "client": "Ana"},
                {"id": "broken", "title": "No times"},
                {"id": 3, "title": "Retorno", "start": "2024-06-04T14:00:00",
                 "end": "2024-06-04T15:00:00", "confirmed": false}
            ]
        });
        let events = extract_events(&body);
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "broken", "3"]);
        assert!(events[1].start.is_empty());
    }

    #[test]
    fn test_malformed_entries_keep_batch_positions() {
        let body = json!({
            "events": [
                {"id": "a", "title": "Sem fim", "start": "2024-06-03T08:00:00",
                 "end": null, "confirmed": true},
                {"id": "b", "title": "Consulta", "start": "2024-06-03T09:00:00",
                 "end": "2024-06-03T10:00:00", "confirmed": true},
                {"id": "c", "title": "Retorno", "start": "2024-06-03T11:00:00",
                 "end": "2024-06-03T11:30:00", "confirmed": null},
                {"id": "d", "title": "Errado", "start": "2024-06-03T12:00:00",
                 "end": "2024-06-03T12:30:00", "confirmed": "yes"},
                {"id": "e", "title": "Depois", "start": "2024-06-03T14:00:00",
                 "end": "2024-06-03T15:00:00", "confirmed": true}
            ]
        });
        let events = extract_events(&body);
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);

        let projected = project_events_in(&events, &Utc);
        let ids: Vec<&str> = projected.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "e"]);
        assert_eq!(projected[0].color_class, PALETTE[1]);
        assert_eq!(projected[1].color_class, PENDING_CLASS);
        assert_eq!(projected[2].color_class, PALETTE[4]);
    }

    #[test]
    fn test_extract_events_absent_or_malformed_field() {
        assert!(extract_events(&json!({})).is_empty());
        assert!(extract_events(&json!({"events": null})).is_empty());
        assert!(extract_events(&json!({"events": "soon"})).is_empty());
        assert!(extract_events(&json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_week_url_keeps_existing_query() {
        let mut config = Config::new("http://localhost:8000/agenda/api/week/?tenant=7");
        config.fetch_timeout_secs = 0;
        let source = HttpEventSource::from_config(&config).unwrap();
        let url = source.week_url(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/agenda/api/week/?tenant=7&week_start=2024-06-03"
        );
    }

    #[test]
    fn test_from_config_rejects_bad_endpoint() {
        assert!(HttpEventSource::from_config(&Config::new("::nope::")).is_err());
    }
}
