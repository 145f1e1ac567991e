use crate::table::Table;
use crate::transform::utility::difference;

/// Day-over-day change of every column.
///
/// Row `i` of the result is labelled with the date of input row `i + 1` and
/// holds `input[i + 1] - input[i]`, so the output has one row fewer than the
/// input. Missing values on either side give a missing difference.
pub fn delta(table: &Table) -> Table {
    let mut out = Table::like(table);

    for pair in table.rows().windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        let values = current
            .values
            .iter()
            .zip(&previous.values)
            .map(|(c, p)| difference(*c, *p))
            .collect();
        out.push_row(current.date, values);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::DATE_INDEX;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 5, d).unwrap()
    }

    fn cumulative() -> Table {
        let mut t = Table::new(DATE_INDEX, vec!["Alabama".into(), "Alaska".into()]);
        t.push_row(day(20), vec![Some(100.0), Some(10.0)]);
        t.push_row(day(21), vec![Some(130.0), None]);
        t.push_row(day(22), vec![Some(135.0), Some(14.0)]);
        t
    }

    #[test]
    fn test_one_row_fewer() {
        let d = delta(&cumulative());
        assert_eq!(d.row_count(), 2);
        assert_eq!(d.columns(), cumulative().columns());
        assert_eq!(d.dates().collect::<Vec<_>>(), vec![day(21), day(22)]);
    }

    #[test]
    fn test_differences_per_column() {
        let d = delta(&cumulative());
        assert_eq!(d.get(day(21), "Alabama"), Some(30.0));
        assert_eq!(d.get(day(22), "Alabama"), Some(5.0));
    }

    #[test]
    fn test_missing_propagates() {
        let d = delta(&cumulative());
        assert_eq!(d.get(day(21), "Alaska"), None);
        assert_eq!(d.get(day(22), "Alaska"), None);
    }

    #[test]
    fn test_single_row_gives_empty_table() {
        let mut t = Table::new(DATE_INDEX, vec!["Guam".into()]);
        t.push_row(day(1), vec![Some(1.0)]);
        let d = delta(&t);
        assert!(d.is_empty());
        assert_eq!(d.column_count(), 1);
        assert!(delta(&Table::like(&t)).is_empty());
    }
}
