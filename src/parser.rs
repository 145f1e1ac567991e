//! CSV parser for the US daily reports.

use csv::ReaderBuilder;

use crate::error::ReportError;
use crate::metric::Metric;

/// Column holding the region name in every daily report.
pub const REGION_COLUMN: &str = "Province_State";

/// One region's value of the selected metric on a single day.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionValue {
    pub region: String,
    pub value: Option<f64>,
}

/// Projects a daily report down to `(region, metric)` pairs in file order.
///
/// Empty or non-numeric cells become `None`; rows without a region name are
/// skipped.
///
/// # Errors
///
/// Returns [`ReportError::MissingColumn`] if the region or metric column is
/// absent, and [`ReportError::Csv`] if the bytes are not valid CSV.
pub fn parse_daily_report(bytes: &[u8], metric: Metric) -> Result<Vec<RegionValue>, ReportError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers = rdr.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
            .ok_or_else(|| ReportError::MissingColumn(name.to_string()))
    };
    let region_idx = position(REGION_COLUMN)?;
    let metric_idx = position(metric.column())?;

    let mut values = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let region = record.get(region_idx).unwrap_or("").trim();
        if region.is_empty() {
            continue;
        }
        let value = record.get(metric_idx).and_then(parse_cell);
        values.push(RegionValue {
            region: region.to_string(),
            value,
        });
    }

    Ok(values)
}

fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| !v.is_nan())
}
