//! Date-indexed table of per-region values.

use chrono::NaiveDate;
use serde::Serialize;

/// Name of the row axis for tables produced directly from daily reports.
pub const DATE_INDEX: &str = "Date";

/// Rows are dates, columns are regions, cells are optional values.
///
/// Rows keep insertion order; every row holds exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    index_name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

impl Table {
    pub fn new(index_name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            index_name: index_name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Empty table with the same index name and columns as `other`.
    pub fn like(other: &Table) -> Self {
        Self::new(other.index_name.clone(), other.columns.clone())
    }

    /// Appends a row. `values` is padded with `None` or truncated to the column count.
    pub fn push_row(&mut self, date: NaiveDate, mut values: Vec<Option<f64>>) {
        values.resize(self.columns.len(), None);
        self.rows.push(Row { date, values });
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn set_index_name(&mut self, name: impl Into<String>) {
        self.index_name = name.into();
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|r| r.date)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of the first row labelled `date`.
    pub fn row(&self, date: NaiveDate) -> Option<&[Option<f64>]> {
        self.rows
            .iter()
            .find(|r| r.date == date)
            .map(|r| r.values.as_slice())
    }

    pub fn get(&self, date: NaiveDate, column: &str) -> Option<f64> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.row(date)?.get(idx).copied().flatten()
    }

    pub fn has_missing(&self) -> bool {
        self.rows.iter().any(|r| r.values.iter().any(Option::is_none))
    }

    /// Removes every column that has a missing value in any row.
    pub fn drop_incomplete_columns(&mut self) {
        let keep: Vec<bool> = (0..self.columns.len())
            .map(|c| self.rows.iter().all(|r| r.values[c].is_some()))
            .collect();

        let mut flags = keep.iter();
        self.columns.retain(|_| *flags.next().unwrap_or(&false));
        for row in &mut self.rows {
            let mut flags = keep.iter();
            row.values.retain(|_| *flags.next().unwrap_or(&false));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 5, d).unwrap()
    }

    fn sample() -> Table {
        let mut t = Table::new(DATE_INDEX, vec!["Alabama".into(), "Alaska".into(), "Guam".into()]);
        t.push_row(day(1), vec![Some(1.0), Some(2.0), None]);
        t.push_row(day(2), vec![Some(3.0), Some(4.0), Some(5.0)]);
        t
    }

    #[test]
    fn test_lookup() {
        let t = sample();
        assert_eq!(t.get(day(2), "Alaska"), Some(4.0));
        assert_eq!(t.get(day(1), "Guam"), None);
        assert_eq!(t.get(day(3), "Alaska"), None);
        assert_eq!(t.get(day(1), "Texas"), None);
        assert_eq!(t.row(day(1)).unwrap().len(), 3);
    }

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut t = Table::new(DATE_INDEX, vec!["A".into(), "B".into()]);
        t.push_row(day(1), vec![Some(1.0)]);
        assert_eq!(t.row(day(1)).unwrap(), &[Some(1.0), None]);
        assert!(t.has_missing());
    }

    #[test]
    fn test_drop_incomplete_columns() {
        let mut t = sample();
        assert!(t.has_missing());
        t.drop_incomplete_columns();
        assert_eq!(t.columns(), &["Alabama".to_string(), "Alaska".to_string()]);
        assert_eq!(t.row(day(2)).unwrap(), &[Some(3.0), Some(4.0)]);
        assert!(!t.has_missing());
        assert_eq!(t.row_count(), 2);
    }

    #[test]
    fn test_like_copies_shape_without_rows() {
        let t = Table::like(&sample());
        assert!(t.is_empty());
        assert_eq!(t.column_count(), 3);
        assert_eq!(t.index_name(), DATE_INDEX);
    }
}
