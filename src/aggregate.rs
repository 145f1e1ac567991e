//! Builds the date-by-region table from one daily report per day.
//!
//! Each date in the range is fetched in turn. A date whose report cannot be
//! fetched or projected is skipped and recorded as a [`DateOutcome`] rather
//! than aborting the run, so callers can audit what went into the table.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::{Error, ReportError, Result};
use crate::metric::Metric;
use crate::parser::{RegionValue, parse_daily_report};
use crate::source::ReportSource;
use crate::table::{DATE_INDEX, Table};

/// First day published in the US daily reports.
pub const FIRST_REPORT_DATE: NaiveDate = NaiveDate::from_ymd_opt(2020, 4, 12).expect("valid date");

/// Inclusive range of report dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// From the first published report through `today`.
    pub fn through(today: NaiveDate) -> Self {
        Self::new(FIRST_REPORT_DATE, today)
    }

    /// Every date in the range, ascending. Empty if `end < start`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Fetch(String),
    Parse(String),
    MissingColumn(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DateStatus {
    Included { regions: usize },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateOutcome {
    pub date: NaiveDate,
    pub status: DateStatus,
}

/// Result of an aggregation run: the table plus what happened to each date.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub metric: Metric,
    pub table: Table,
    pub outcomes: Vec<DateOutcome>,
}

impl Aggregation {
    pub fn included_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, DateStatus::Included { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.included_count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &DateOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, DateStatus::Skipped(_)))
    }
}

/// Fetches every report in `range` and joins the `metric` column of each on region.
///
/// Columns are regions in the order they were first seen; rows are the dates
/// that could be loaded. With `drop_incomplete_regions`, regions missing a
/// value on any included date are removed.
///
/// # Errors
///
/// Returns [`Error::NoReports`] if no date in the range could be loaded.
#[tracing::instrument(
    skip_all,
    fields(
        metric = %metric,
        drop_incomplete_regions = drop_incomplete_regions,
        start = %range.start,
        end = %range.end
    )
)]
pub async fn aggregate<S: ReportSource + ?Sized>(
    source: &S,
    metric: Metric,
    drop_incomplete_regions: bool,
    range: DateRange,
) -> Result<Aggregation> {
    let mut outcomes = Vec::new();
    let mut daily: Vec<(NaiveDate, Vec<RegionValue>)> = Vec::new();

    for date in range.days() {
        let status = match load_day(source, date, metric).await {
            Ok(values) => {
                debug!(date = %date, regions = values.len(), "Report loaded");
                let regions = values.len();
                daily.push((date, values));
                DateStatus::Included { regions }
            }
            Err(reason) => {
                warn!(date = %date, reason = ?reason, "Skipping report");
                DateStatus::Skipped(reason)
            }
        };
        outcomes.push(DateOutcome { date, status });
    }

    if daily.is_empty() {
        return Err(Error::NoReports {
            start: range.start,
            end: range.end,
        });
    }

    let mut table = merge(daily);
    if drop_incomplete_regions {
        let before = table.column_count();
        table.drop_incomplete_columns();
        debug!(dropped = before - table.column_count(), "Dropped incomplete regions");
    }

    let aggregation = Aggregation {
        metric,
        table,
        outcomes,
    };
    info!(
        included = aggregation.included_count(),
        skipped = aggregation.skipped_count(),
        regions = aggregation.table.column_count(),
        "Aggregation complete"
    );

    Ok(aggregation)
}

async fn load_day<S: ReportSource + ?Sized>(
    source: &S,
    date: NaiveDate,
    metric: Metric,
) -> std::result::Result<Vec<RegionValue>, SkipReason> {
    let bytes = source
        .fetch_report(date)
        .await
        .map_err(|e| SkipReason::Fetch(e.to_string()))?;

    parse_daily_report(&bytes, metric).map_err(|e| match e {
        ReportError::MissingColumn(column) => SkipReason::MissingColumn(column),
        other => SkipReason::Parse(other.to_string()),
    })
}

/// Outer-joins the per-day values on region name, one row per day.
fn merge(daily: Vec<(NaiveDate, Vec<RegionValue>)>) -> Table {
    let mut columns: Vec<String> = Vec::new();
    let mut column_idx: HashMap<String, usize> = HashMap::new();

    for (_, values) in &daily {
        for v in values {
            if !column_idx.contains_key(&v.region) {
                column_idx.insert(v.region.clone(), columns.len());
                columns.push(v.region.clone());
            }
        }
    }

    let mut table = Table::new(DATE_INDEX, columns);
    for (date, values) in daily {
        let mut row: Vec<Option<f64>> = vec![None; table.column_count()];
        let mut seen = vec![false; table.column_count()];
        for v in values {
            let idx = column_idx[&v.region];
            // first row for a region wins
            if !seen[idx] {
                seen[idx] = true;
                row[idx] = v.value;
            }
        }
        table.push_row(date, row);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedSource(HashMap<NaiveDate, &'static str>);

    #[async_trait]
    impl ReportSource for FixedSource {
        async fn fetch_report(&self, date: NaiveDate) -> anyhow::Result<Vec<u8>> {
            self.0
                .get(&date)
                .map(|s| s.as_bytes().to_vec())
                .ok_or_else(|| anyhow::anyhow!("404 Not Found"))
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 6, d).unwrap()
    }

    fn source() -> FixedSource {
        FixedSource(HashMap::from([
            (day(1), "Province_State,Confirmed\nAlabama,10\nAlaska,1\n"),
            (day(2), "Province_State,Confirmed\nAlabama,12\nAlaska,2\nGuam,7\n"),
            (day(4), "Province_State,Deaths\nAlabama,1\n"),
            (day(5), "Province_State,Confirmed\nAlaska,4\nAlabama,15\nAlabama,99\n"),
        ]))
    }

    #[test]
    fn test_date_range_days() {
        let range = DateRange::new(day(1), day(3));
        assert_eq!(range.days().collect::<Vec<_>>(), vec![day(1), day(2), day(3)]);
        assert_eq!(DateRange::new(day(3), day(1)).days().count(), 0);
        assert_eq!(DateRange::through(FIRST_REPORT_DATE).days().count(), 1);
    }

    #[tokio::test]
    async fn test_outer_join_keeps_all_regions() {
        let agg = aggregate(&source(), Metric::Confirmed, false, DateRange::new(day(1), day(5)))
            .await
            .unwrap();
        let t = &agg.table;

        assert_eq!(t.index_name(), "Date");
        assert_eq!(t.columns(), &["Alabama".to_string(), "Alaska".to_string(), "Guam".to_string()]);
        assert_eq!(t.dates().collect::<Vec<_>>(), vec![day(1), day(2), day(5)]);
        assert_eq!(t.get(day(1), "Guam"), None);
        assert_eq!(t.get(day(2), "Guam"), Some(7.0));
        assert_eq!(t.get(day(5), "Alaska"), Some(4.0));
        assert!(t.has_missing());
    }

    #[tokio::test]
    async fn test_duplicate_region_keeps_first_row() {
        let agg = aggregate(&source(), Metric::Confirmed, false, DateRange::new(day(5), day(5)))
            .await
            .unwrap();
        assert_eq!(agg.table.get(day(5), "Alabama"), Some(15.0));
    }

    #[tokio::test]
    async fn test_dropna_removes_incomplete_regions() {
        let agg = aggregate(&source(), Metric::Confirmed, true, DateRange::new(day(1), day(5)))
            .await
            .unwrap();
        assert_eq!(agg.table.columns(), &["Alabama".to_string(), "Alaska".to_string()]);
        assert!(!agg.table.has_missing());
    }

    #[tokio::test]
    async fn test_outcomes_record_skips() {
        let agg = aggregate(&source(), Metric::Confirmed, false, DateRange::new(day(1), day(5)))
            .await
            .unwrap();

        assert_eq!(agg.outcomes.len(), 5);
        assert_eq!(agg.included_count(), 3);
        assert_eq!(agg.skipped_count(), 2);
        assert_eq!(agg.outcomes[1].status, DateStatus::Included { regions: 3 });
        assert!(matches!(agg.outcomes[2].status, DateStatus::Skipped(SkipReason::Fetch(_))));
        assert_eq!(
            agg.outcomes[3].status,
            DateStatus::Skipped(SkipReason::MissingColumn("Confirmed".to_string()))
        );
        assert_eq!(agg.skipped().map(|o| o.date).collect::<Vec<_>>(), vec![day(3), day(4)]);
    }

    #[tokio::test]
    async fn test_no_reports_is_an_error() {
        let result = aggregate(&source(), Metric::Confirmed, false, DateRange::new(day(10), day(12))).await;
        assert!(matches!(
            result,
            Err(Error::NoReports { start, end }) if start == day(10) && end == day(12)
        ));
    }

    #[tokio::test]
    async fn test_repeat_runs_are_identical() {
        let range = DateRange::new(day(1), day(5));
        let first = aggregate(&source(), Metric::Confirmed, false, range).await.unwrap();
        let second = aggregate(&source(), Metric::Confirmed, false, range).await.unwrap();
        assert_eq!(first.table, second.table);
    }
}
