//! Where daily reports come from.
//!
//! [`ReportSource`] yields the raw CSV bytes of one day's report.
//! [`HttpReportSource`] implements it over any [`HttpClient`], requesting
//! `{base_url}/{MM-DD-YYYY}.csv`.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::Config;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes};

/// Date format used in report file names.
pub const REPORT_DATE_FORMAT: &str = "%m-%d-%Y";

#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Returns the raw report for `date`, or an error if it cannot be obtained.
    async fn fetch_report(&self, date: NaiveDate) -> Result<Vec<u8>>;
}

/// Builds the URL of the report for `date` under `base_url`.
pub fn report_url(base_url: &str, date: NaiveDate) -> String {
    format!(
        "{}/{}.csv",
        base_url.trim_end_matches('/'),
        date.format(REPORT_DATE_FORMAT)
    )
}

pub struct HttpReportSource<C> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> HttpReportSource<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl HttpReportSource<BasicClient> {
    /// Source using a [`BasicClient`] configured from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = match config.http_timeout {
            Some(timeout) => BasicClient::with_timeout(timeout)?,
            None => BasicClient::new(),
        };
        Ok(Self::new(client, config.base_url.clone()))
    }
}

#[async_trait]
impl<C: HttpClient> ReportSource for HttpReportSource<C> {
    async fn fetch_report(&self, date: NaiveDate) -> Result<Vec<u8>> {
        let url = report_url(&self.base_url, date);
        fetch_bytes(&self.client, &url).await
    }
}
