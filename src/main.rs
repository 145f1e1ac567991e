//! CLI entry point for the COVID-19 daily report aggregator.
//!
//! Provides subcommands for building the date-by-region table of a metric,
//! its day-over-day changes, and the two-week window around a date.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use covid_reports::{
    DateRange, Metric, Table, aggregate,
    config::Config,
    delta,
    output::{OutputFormat, read_table, write_table},
    source::{HttpReportSource, report_url},
    transform::window::{WindowOptions, parse_target_date, window},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "covid_reports")]
#[command(about = "Aggregate the JHU CSSE US daily COVID-19 reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every daily report and build the date-by-region table
    Aggregate {
        #[command(flatten)]
        fetch: FetchArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Day-over-day change of each region
    Delta {
        /// Previously written aggregate CSV to use instead of fetching
        #[arg(short, long)]
        input: Option<String>,

        #[command(flatten)]
        fetch: FetchArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Values two weeks before, at, and two weeks after a date
    Window {
        /// Previously written aggregate CSV to use instead of fetching
        #[arg(short, long)]
        input: Option<String>,

        /// Date of interest as MM/DD/YYYY (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Average each anchor with the day before and after it
        #[arg(long, default_value_t = false)]
        average_neighbors: bool,

        #[command(flatten)]
        fetch: FetchArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the report URL for a date
    Url {
        /// Report date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Args)]
struct FetchArgs {
    /// Report column to aggregate (defaults to COVID_REPORTS_METRIC, then incident-rate)
    #[arg(short, long, value_enum)]
    metric: Option<Metric>,

    /// Drop regions with a missing value on any date
    #[arg(long, default_value_t = false)]
    dropna: bool,

    /// Last report date as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[derive(Args)]
struct OutputArgs {
    /// File to write the table to (stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,

    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/covid_reports.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("covid_reports.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Aggregate { fetch, output } => {
            let table = fetch_table(&config, &fetch, today).await?;
            emit(&table, &output)?;
        }
        Commands::Delta {
            input,
            fetch,
            output,
        } => {
            let table = load_table(&config, input.as_deref(), &fetch, today).await?;
            emit(&delta(&table), &output)?;
        }
        Commands::Window {
            input,
            date,
            average_neighbors,
            fetch,
            output,
        } => {
            let target = match date {
                Some(date) => parse_target_date(&date)?,
                None => today,
            };
            let table = load_table(&config, input.as_deref(), &fetch, today).await?;
            let result = window(&table, target, WindowOptions { average_neighbors });
            if result.row_count() < 3 {
                warn!(rows = result.row_count(), target = %target, "Partial window");
            }
            emit(&result, &output)?;
        }
        Commands::Url { date } => {
            println!("{}", report_url(&config.base_url, date.unwrap_or(today)));
        }
    }

    Ok(())
}

/// Reads a saved table when `input` is given, otherwise fetches one.
async fn load_table(
    config: &Config,
    input: Option<&str>,
    fetch: &FetchArgs,
    today: NaiveDate,
) -> Result<Table> {
    match input {
        Some(path) => {
            info!(path, "Loading saved table");
            Ok(read_table(path)?)
        }
        None => fetch_table(config, fetch, today).await,
    }
}

/// Fetches and aggregates every daily report from the configured start date.
#[tracing::instrument(skip_all, fields(dropna = fetch.dropna))]
async fn fetch_table(config: &Config, fetch: &FetchArgs, today: NaiveDate) -> Result<Table> {
    let metric = fetch.metric.unwrap_or(config.default_metric);
    let source = HttpReportSource::from_config(config)?;
    let range = DateRange::new(config.start_date, fetch.end.unwrap_or(today));

    let aggregation = aggregate(&source, metric, fetch.dropna, range).await?;

    if let Some(last) = aggregation.skipped().last() {
        info!(
            skipped = aggregation.skipped_count(),
            last_skipped = %last.date,
            "Some dates had no usable report"
        );
    }

    Ok(aggregation.table)
}

fn emit(table: &Table, output: &OutputArgs) -> Result<()> {
    write_table(table, output.output.as_deref(), output.format)?;
    if let Some(path) = &output.output {
        info!(path = %path, rows = table.row_count(), columns = table.column_count(), "Table written");
    }
    Ok(())
}
