//! Output formatting and persistence for tables.
//!
//! Supports JSON serialization and CSV export/import.

use std::fs::File;
use std::io::{self, Read, Write};

use chrono::NaiveDate;
use clap::ValueEnum;
use csv::{ReaderBuilder, WriterBuilder};
use tracing::debug;

use crate::error::{Error, Result};
use crate::source::REPORT_DATE_FORMAT;
use crate::table::Table;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Writes `table` as CSV: the index name and regions as header, one line per
/// date (`MM-DD-YYYY`), missing values as empty cells.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);

    let mut header = vec![table.index_name().to_string()];
    header.extend(table.columns().iter().cloned());
    wtr.write_record(&header)?;

    for row in table.rows() {
        let mut record = vec![row.date.format(REPORT_DATE_FORMAT).to_string()];
        record.extend(
            row.values
                .iter()
                .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Reads a table previously written by [`write_csv`].
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut header_iter = headers.iter();
    let index_name = header_iter
        .next()
        .ok_or_else(|| Error::Table("missing header row".into()))?;
    let mut table = Table::new(index_name, header_iter.map(str::to_string).collect());

    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        let label = record.get(0).unwrap_or("");
        let date = NaiveDate::parse_from_str(label, REPORT_DATE_FORMAT).map_err(|e| {
            Error::Table(format!("row {}: bad date '{label}': {e}", line + 1))
        })?;

        let mut values = Vec::with_capacity(table.column_count());
        for cell in record.iter().skip(1) {
            let cell = cell.trim();
            if cell.is_empty() {
                values.push(None);
            } else {
                let v = cell.parse::<f64>().map_err(|e| {
                    Error::Table(format!("row {}: bad value '{cell}': {e}", line + 1))
                })?;
                values.push(Some(v));
            }
        }
        table.push_row(date, values);
    }

    Ok(table)
}

/// Writes `table` to `path`, or to stdout when no path is given.
pub fn write_table(table: &Table, path: Option<&str>, format: OutputFormat) -> Result<()> {
    match path {
        Some(path) => {
            debug!(path, rows = table.row_count(), "Writing table");
            emit(table, File::create(path)?, format)
        }
        None => emit(table, io::stdout().lock(), format),
    }
}

/// Loads a CSV table from `path`.
pub fn read_table(path: &str) -> Result<Table> {
    read_csv(File::open(path)?)
}

fn emit<W: Write>(table: &Table, mut writer: W, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(table, writer),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, table)?;
            writeln!(writer)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::DATE_INDEX;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample() -> Table {
        let mut t = Table::new(DATE_INDEX, vec!["Alabama".into(), "Guam".into()]);
        t.push_row(NaiveDate::from_ymd_opt(2020, 4, 12).unwrap(), vec![Some(1.5), None]);
        t.push_row(NaiveDate::from_ymd_opt(2020, 4, 13).unwrap(), vec![Some(2.0), Some(3.0)]);
        t
    }

    #[test]
    fn test_write_csv_layout() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines, vec!["Date,Alabama,Guam", "04-12-2020,1.5,", "04-13-2020,2,3"]);
    }

    #[test]
    fn test_read_back_written_table() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf).unwrap();
        assert_eq!(read_csv(buf.as_slice()).unwrap(), sample());
    }

    #[test]
    fn test_read_csv_rejects_bad_date() {
        let csv = "Date,Ohio\n2020-04-12,1\n";
        assert!(matches!(read_csv(csv.as_bytes()), Err(Error::Table(_))));
    }

    #[test]
    fn test_write_table_to_file() {
        let path = temp_path("covid_reports_test_table.json");
        let _ = fs::remove_file(&path);

        write_table(&sample(), Some(&path), OutputFormat::Json).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["index_name"], "Date");
        assert_eq!(json["rows"][0]["date"], "2020-04-12");
        assert!(json["rows"][0]["values"][1].is_null());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_table_from_file() {
        let path = temp_path("covid_reports_test_table.csv");
        let _ = fs::remove_file(&path);

        write_table(&sample(), Some(&path), OutputFormat::Csv).unwrap();
        let table = read_table(&path).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(NaiveDate::from_ymd_opt(2020, 4, 13).unwrap(), "Guam"), Some(3.0));

        fs::remove_file(&path).unwrap();
    }
}
