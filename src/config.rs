//! Configuration for the MATRI client

use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Connection settings and rule-engine windows.
/// Load the project URL and anon key from the environment or a secure source.
#[derive(Debug, Clone)]
pub struct MatriConfig {
    /// Base URL of the Supabase project
    pub url: Url,

    /// Anonymous API key of the project
    pub anon_key: String,

    /// Timeout applied to every remote call
    pub request_timeout: Option<Duration>,

    /// Whether expired access tokens are refreshed before remote calls
    pub auto_refresh_token: bool,

    /// Window used by the recent-symptoms query
    pub recent_symptom_days: i64,

    /// Window the safety-alert classifier looks back over
    pub alert_lookback_days: i64,
}

impl MatriConfig {
    /// Creates a new configuration, validating the URL and key.
    pub fn new(url_str: &str, anon_key: &str) -> Result<Self> {
        let url = Url::parse(url_str)?;
        if anon_key.is_empty() {
            return Err(Error::config("anon_key cannot be empty"));
        }
        Ok(Self {
            url,
            anon_key: anon_key.to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            auto_refresh_token: true,
            recent_symptom_days: 7,
            alert_lookback_days: 1,
        })
    }

    /// Reads `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    pub fn from_env() -> Result<Self> {
        let url_str = std::env::var("SUPABASE_URL")
            .map_err(|_| Error::config("SUPABASE_URL environment variable not found"))?;
        let anon_key = std::env::var("SUPABASE_ANON_KEY")
            .map_err(|_| Error::config("SUPABASE_ANON_KEY environment variable not found"))?;
        Self::new(&url_str, &anon_key)
    }

    /// Base URL without the trailing slash `Url` adds
    pub fn base_url(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }

    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    pub fn with_auto_refresh_token(mut self, value: bool) -> Self {
        self.auto_refresh_token = value;
        self
    }

    pub fn with_recent_symptom_days(mut self, days: i64) -> Self {
        self.recent_symptom_days = days;
        self
    }

    pub fn with_alert_lookback_days(mut self, days: i64) -> Self {
        self.alert_lookback_days = days;
        self
    }
}
