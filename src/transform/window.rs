//! Before/at/after comparison around a date of interest.
//!
//! Effects of an event (a policy change, a holiday) show up in the case
//! numbers with a delay of up to two weeks, so the window looks at the
//! target date and the dates 14 days either side of it.

use chrono::{Days, NaiveDate};
use tracing::warn;

use crate::error::{Error, Result};
use crate::source::REPORT_DATE_FORMAT;
use crate::table::{DATE_INDEX, Table};
use crate::transform::utility::mean_present;

/// Distance between the target date and the before/after anchors.
pub const ANCHOR_OFFSET_DAYS: u64 = 14;

/// Row-axis name used when neighboring days are averaged.
pub const AVERAGED_INDEX: &str = "Values Averaged Around Day";

/// Format of the target date accepted by [`parse_target_date`].
pub const TARGET_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowOptions {
    /// Smooth each anchor with the day before and after it.
    pub average_neighbors: bool,
}

/// Parses a `MM/DD/YYYY` target date.
pub fn parse_target_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), TARGET_DATE_FORMAT).map_err(|source| {
        Error::InvalidDate {
            input: input.to_string(),
            source,
        }
    })
}

/// The three anchor dates: `target - 14d`, `target`, `target + 14d`.
pub fn anchor_dates(target: NaiveDate) -> Vec<NaiveDate> {
    let offset = Days::new(ANCHOR_OFFSET_DAYS);
    [target.checked_sub_days(offset), Some(target), target.checked_add_days(offset)]
        .into_iter()
        .flatten()
        .collect()
}

/// Up to three rows of `table`, one per anchor date that has data.
///
/// Without averaging, an anchor is kept only if its exact date is a row of
/// `table`. With averaging, the anchor row is the per-column mean over
/// whichever of the day before, the day itself and the day after exist,
/// skipping missing cells. Anchors with no data are reported with a warning
/// and left out.
pub fn window(table: &Table, target: NaiveDate, options: WindowOptions) -> Table {
    let mut out = Table::like(table);
    out.set_index_name(if options.average_neighbors {
        AVERAGED_INDEX
    } else {
        DATE_INDEX
    });

    for anchor in anchor_dates(target) {
        let values = if options.average_neighbors {
            averaged_row(table, anchor)
        } else {
            table.row(anchor).map(<[Option<f64>]>::to_vec)
        };

        match values {
            Some(values) => out.push_row(anchor, values),
            None => warn!(
                anchor = %anchor,
                "Insufficient data for {}",
                anchor.format(REPORT_DATE_FORMAT)
            ),
        }
    }

    out
}

fn averaged_row(table: &Table, anchor: NaiveDate) -> Option<Vec<Option<f64>>> {
    let one_day = Days::new(1);
    let neighborhood: Vec<&[Option<f64>]> = [
        anchor.checked_sub_days(one_day),
        Some(anchor),
        anchor.checked_add_days(one_day),
    ]
    .into_iter()
    .flatten()
    .filter_map(|d| table.row(d))
    .collect();

    if neighborhood.is_empty() {
        return None;
    }

    let averaged = (0..table.column_count())
        .map(|c| {
            let column: Vec<Option<f64>> = neighborhood.iter().map(|row| row[c]).collect();
            mean_present(&column)
        })
        .collect();
    Some(averaged)
}
