use analytics::{AnalyticsEngine, DashboardReport, Outcome};
use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};
use configuration::{Config, LoggingSettings, load_config, load_config_from};
use core_types::PriceField;
use price_data::{CsvPriceSource, PriceSource, SymbolDirectory};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// The main entry point for the Vantage dashboard.
fn main() -> Result<()> {
    // A missing .env file is normal; values can come from the real environment.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => load_config().context("loading configuration")?,
    };
    let _log_guard = init_logging(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => handle_report(args, &config),
        Commands::Symbols(args) => handle_symbols(args, &config),
    }
}

/// Logs to stderr, plus daily-rolling files when a log directory is configured.
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// flushes the file writer on drop and must live until the program exits.
fn init_logging(settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .with_context(|| format!("invalid log level '{}'", settings.level))?;

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr));

    match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "vantage.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            registry.try_init()?;
            Ok(None)
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Compare a stock against a market index over a chosen period.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of ./config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show returns, a simulated investment and derived series for one symbol.
    Report(ReportArgs),
    /// List the symbols available in the data directory.
    Symbols(SymbolsArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// The ticker to analyse (e.g., "AAPL").
    #[arg(long)]
    symbol: String,

    /// The start date of the period (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// The end date of the period (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// The simulated investment amount.
    #[arg(long)]
    amount: Option<Decimal>,

    /// The index to compare against (e.g., "^GSPC").
    #[arg(long)]
    benchmark: Option<String>,

    /// Number of bars in the moving-average window.
    #[arg(long)]
    window: Option<usize>,

    /// Price column used for the normalized daily-return comparison.
    #[arg(long)]
    field: Option<PriceField>,

    /// Directory holding <SYMBOL>.csv files.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// How many of the most recent rows to print per table.
    #[arg(long, default_value_t = 10)]
    rows: usize,

    /// Print the whole report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct SymbolsArgs {
    /// Directory holding <SYMBOL>.csv files.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_report(args: ReportArgs, config: &Config) -> Result<()> {
    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.directory.clone());
    let source = CsvPriceSource::new(&data_dir);

    let start = args.from.unwrap_or(config.dashboard.start_date);
    let end = args
        .to
        .or(config.dashboard.end_date)
        .unwrap_or_else(|| Local::now().date_naive());
    let benchmark_symbol = args
        .benchmark
        .as_deref()
        .unwrap_or(&config.data.benchmark_symbol);

    let mut settings = config.dashboard.settings();
    if let Some(amount) = args.amount {
        settings.investment_amount = amount;
    }
    if let Some(window) = args.window {
        settings.moving_average_window = window;
    }
    if let Some(field) = args.field {
        settings.comparison_field = field;
    }

    tracing::info!(
        symbol = %args.symbol,
        benchmark = %benchmark_symbol,
        %start,
        %end,
        "Building dashboard"
    );

    let instrument = source
        .load(&args.symbol, start, end)
        .with_context(|| format!("loading price history for {}", args.symbol))?;
    let benchmark = source
        .load(benchmark_symbol, start, end)
        .with_context(|| format!("loading price history for {benchmark_symbol}"))?;

    let report = AnalyticsEngine::new()
        .build_dashboard(&instrument, &benchmark, &settings)
        .with_context(|| format!("analysing {} against {}", args.symbol, benchmark_symbol))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let directory = SymbolDirectory::load(&data_dir)?;
    let title = directory
        .security_name(&report.symbol)
        .unwrap_or(&report.symbol);
    println!("{title}");
    println!("{}", metrics_table(&report));

    println!("\n{} and {} daily return (normalized)", report.symbol, report.benchmark_symbol);
    println!("{}", daily_return_table(&report, args.rows));

    println!("\n{} trading volume", report.symbol);
    println!("{}", volume_table(&report, args.rows));

    println!(
        "\n{}-bar moving average of {}",
        report.moving_average_window, settings.moving_average_field
    );
    println!("{}", moving_average_table(&report, args.rows));

    Ok(())
}

fn handle_symbols(args: SymbolsArgs, config: &Config) -> Result<()> {
    let data_dir = args.data_dir.unwrap_or_else(|| config.data.directory.clone());
    let source = CsvPriceSource::new(&data_dir);
    let symbols = source
        .symbols()
        .with_context(|| format!("listing {}", data_dir.display()))?;

    if symbols.is_empty() {
        println!("No price files found in {}", data_dir.display());
        return Ok(());
    }

    let directory = SymbolDirectory::load(&data_dir)?;
    let mut table = new_table(&["Symbol", "Security Name"]);
    for symbol in &symbols {
        table.add_row(vec![
            Cell::new(symbol),
            Cell::new(directory.security_name(symbol).unwrap_or("")),
        ]);
    }
    println!("{table}");
    Ok(())
}

// ==============================================================================
// Presentation
// ==============================================================================

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(headers.to_vec());
    table
}

fn metrics_table(report: &DashboardReport) -> Table {
    let simulation = &report.simulation;
    let simulated = match simulation.outcome() {
        Outcome::Unchanged => format!("{} (unchanged)", format_money(simulation.final_value)),
        _ => format!(
            "{} ({})",
            format_money(simulation.final_value),
            format_signed_money(simulation.delta)
        ),
    };

    let mut table = new_table(&["Metric", "Value"]);
    table.add_row(vec![Cell::new("Simulated return"), right(simulated)]);
    table.add_row(vec![
        Cell::new(format!("{} stock return", report.symbol)),
        right(format_pct(Some(report.instrument_return))),
    ]);
    table.add_row(vec![
        Cell::new(format!("{} return", report.benchmark_symbol)),
        right(format_pct(Some(report.benchmark_return))),
    ]);
    table
}

fn daily_return_table(report: &DashboardReport, rows: usize) -> Table {
    let mut table = new_table(&["Date", report.symbol.as_str(), report.benchmark_symbol.as_str()]);
    for row in tail(&report.daily_returns, rows) {
        table.add_row(vec![
            Cell::new(format_date(row.timestamp)),
            right(format_pct(row.instrument)),
            right(format_pct(row.benchmark)),
        ]);
    }
    table
}

fn volume_table(report: &DashboardReport, rows: usize) -> Table {
    let mut table = new_table(&["Date", "Volume"]);
    for point in tail(&report.volume, rows) {
        table.add_row(vec![
            Cell::new(format_date(point.timestamp)),
            right(format!("{:.0}", point.volume)),
        ]);
    }
    table
}

fn moving_average_table(report: &DashboardReport, rows: usize) -> Table {
    let average_header = format!("MA{}", report.moving_average_window);
    let mut table = new_table(&["Date", "Value", average_header.as_str()]);
    for point in tail(&report.moving_average, rows) {
        table.add_row(vec![
            Cell::new(format_date(point.timestamp)),
            right(format!("{:.2}", point.value)),
            right(format_number(point.average)),
        ]);
    }
    table
}

fn right(text: impl ToString) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// The last `n` items, oldest first.
fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Missing values render as a gap marker, never as zero.
fn format_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}%", v * 100.0))
}

fn format_number(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn format_money(amount: Decimal) -> String {
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount.abs())
    }
}

fn format_signed_money(amount: Decimal) -> String {
    if amount.is_sign_negative() && !amount.is_zero() {
        format_money(amount)
    } else {
        format!("+{}", format_money(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::str::FromStr;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_report_arguments() {
        let cli = Cli::try_parse_from([
            "vantage", "report", "--symbol", "AAPL", "--from", "2020-01-01", "--amount", "2500.50",
            "--field", "adj_close", "--window", "20", "--json",
        ])
        .unwrap();
        let Commands::Report(args) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(args.symbol, "AAPL");
        assert_eq!(args.from, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(args.amount, Some(Decimal::from_str("2500.50").unwrap()));
        assert_eq!(args.field, Some(PriceField::AdjustedClose));
        assert_eq!(args.window, Some(20));
        assert!(args.json);
        assert_eq!(args.rows, 10);
    }

    #[test]
    fn rejects_unknown_field() {
        assert!(Cli::try_parse_from(["vantage", "report", "--symbol", "AAPL", "--field", "vwap"]).is_err());
    }

    #[test]
    fn missing_values_render_as_gaps() {
        assert_eq!(format_pct(None), "-");
        assert_eq!(format_pct(Some(0.0)), "0.00%");
        assert_eq!(format_pct(Some(0.1234)), "12.34%");
        assert_eq!(format_number(None), "-");
    }

    #[test]
    fn money_formatting_keeps_sign_outside_currency() {
        assert_eq!(format_money(Decimal::from_str("1250").unwrap()), "$1250.00");
        assert_eq!(format_signed_money(Decimal::from_str("250.5").unwrap()), "+$250.50");
        assert_eq!(format_signed_money(Decimal::from_str("-100").unwrap()), "-$100.00");
    }

    #[test]
    fn tail_returns_most_recent_items() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(tail(&items, 2), &[4, 5]);
        assert_eq!(tail(&items, 10), &items);
        assert!(tail(&items, 0).is_empty());
    }
}
