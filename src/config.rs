use crate::components::week_calendar::time::DisplayZone;
use crate::error::{config_error, env_error, CalendarResult};
use dotenvy::dotenv;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::time::Duration;
use tracing::{debug, warn};

/// Default locale for the week label and console messages
pub const DEFAULT_LOCALE: &str = "pt-BR";

/// Default fetch timeout in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default location of the optional override file
pub const DEFAULT_CONFIG_FILE: &str = "config/calendar.toml";

/// Main configuration structure for the calendar
#[derive(Debug, Clone)]
pub struct Config {
    /// Week events endpoint, queried with `?week_start=YYYY-MM-DD`
    pub events_endpoint: String,
    /// Raw `Cookie` header value sent with every request
    pub session_cookie: Option<String>,
    /// IANA zone used to display events; host local zone when unset
    pub timezone: Option<String>,
    /// Locale for month names and console messages
    pub locale: String,
    /// Per-request timeout in seconds, 0 disables it
    pub fetch_timeout_secs: u64,
}

/// Values accepted in the TOML override file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub events_endpoint: Option<String>,
    pub session_cookie: Option<String>,
    pub timezone: Option<String>,
    pub locale: Option<String>,
    pub fetch_timeout_secs: Option<u64>,
}

impl Config {
    /// Create a configuration for an endpoint with every other value defaulted
    pub fn new(events_endpoint: impl Into<String>) -> Self {
        Self {
            events_endpoint: events_endpoint.into(),
            session_cookie: None,
            timezone: None,
            locale: DEFAULT_LOCALE.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment and config file
    pub fn load() -> CalendarResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let vars: HashMap<String, String> = env::vars().collect();
        let mut config = Self::from_vars(&vars)?;

        let path = vars
            .get("CALENDAR_CONFIG")
            .cloned()
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        match fs::read_to_string(&path) {
            Ok(content) => {
                let file_config: FileConfig = toml::from_str(&content)?;
                config.apply_file(file_config);
                debug!("Applied configuration overrides from {}", path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not read {}: {}", path, e),
        }

        config.validate()?;
        Ok(config)
    }

    /// Build configuration from a map of environment variables
    pub fn from_vars(vars: &HashMap<String, String>) -> CalendarResult<Self> {
        let events_endpoint = vars
            .get("EVENTS_ENDPOINT")
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .ok_or_else(|| env_error("EVENTS_ENDPOINT"))?;

        let mut config = Self::new(events_endpoint);
        config.session_cookie = non_empty(vars.get("SESSION_COOKIE"));
        config.timezone = non_empty(vars.get("TIMEZONE"));

        if let Some(locale) = non_empty(vars.get("CALENDAR_LOCALE")) {
            config.locale = locale;
        }

        if let Some(timeout) = vars.get("FETCH_TIMEOUT_SECS") {
            config.fetch_timeout_secs = timeout
                .trim()
                .parse::<u64>()
                .map_err(|_| config_error("Invalid FETCH_TIMEOUT_SECS format"))?;
        }

        Ok(config)
    }

    /// Merge the values present in an override file
    pub fn apply_file(&mut self, file: FileConfig) {
        if let Some(endpoint) = file.events_endpoint {
            self.events_endpoint = endpoint;
        }
        if file.session_cookie.is_some() {
            self.session_cookie = file.session_cookie;
        }
        if file.timezone.is_some() {
            self.timezone = file.timezone;
        }
        if let Some(locale) = file.locale {
            self.locale = locale;
        }
        if let Some(timeout) = file.fetch_timeout_secs {
            self.fetch_timeout_secs = timeout;
        }
    }

    /// Check values that can only be validated after merging
    pub fn validate(&self) -> CalendarResult<()> {
        url::Url::parse(&self.events_endpoint)
            .map_err(|e| config_error(&format!("Invalid events endpoint: {}", e)))?;
        self.display_zone()?;
        Ok(())
    }

    /// Zone used for "today" and for placing events
    pub fn display_zone(&self) -> CalendarResult<DisplayZone> {
        match &self.timezone {
            Some(name) => DisplayZone::named(name),
            None => Ok(DisplayZone::Local),
        }
    }

    /// Fetch timeout, `None` when disabled
    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_secs > 0).then(|| Duration::from_secs(self.fetch_timeout_secs))
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}
