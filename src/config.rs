//! Runtime configuration, read from the environment (and `.env` via the binary).

use std::time::Duration;

use chrono::NaiveDate;

use crate::aggregate::FIRST_REPORT_DATE;
use crate::error::{Error, Result};
use crate::metric::Metric;

/// Directory holding one `MM-DD-YYYY.csv` file per day.
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_daily_reports_us";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub start_date: NaiveDate,
    /// Metric aggregated when the command line does not name one.
    pub default_metric: Metric,
    /// `None` leaves the HTTP client's own defaults in place.
    pub http_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            start_date: FIRST_REPORT_DATE,
            default_metric: Metric::default(),
            http_timeout: None,
        }
    }
}

impl Config {
    /// Reads `COVID_REPORTS_BASE_URL`, `COVID_REPORTS_START_DATE` (`YYYY-MM-DD`),
    /// `COVID_REPORTS_METRIC` and `COVID_HTTP_TIMEOUT_SECS` from the process
    /// environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("COVID_REPORTS_BASE_URL") {
            let url = url.trim();
            if url.is_empty() {
                return Err(Error::Config("COVID_REPORTS_BASE_URL is empty".into()));
            }
            config.base_url = url.to_string();
        }

        if let Some(raw) = lookup("COVID_REPORTS_START_DATE") {
            config.start_date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
                Error::Config(format!("COVID_REPORTS_START_DATE '{raw}': {e}"))
            })?;
        }

        if let Some(raw) = lookup("COVID_REPORTS_METRIC") {
            config.default_metric = raw
                .parse()
                .map_err(|e| Error::Config(format!("COVID_REPORTS_METRIC: {e}")))?;
        }

        if let Some(raw) = lookup("COVID_HTTP_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|e| {
                Error::Config(format!("COVID_HTTP_TIMEOUT_SECS '{raw}': {e}"))
            })?;
            config.http_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}
