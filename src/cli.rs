//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{
    self, BacktestConfig, ShortSeriesPolicy, DEFAULT_INITIAL_CASH, DEFAULT_LONG_WINDOW,
    DEFAULT_SHORT_WINDOW,
};
use crate::domain::config_validation::validate_backtest_config;
use crate::domain::error::BacktestError;
use crate::domain::price::PriceSeries;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "goldencross", about = "Moving-average crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the configured symbol
        #[arg(long)]
        symbol: Option<String>,
        /// Override the configured price data directory
        #[arg(long)]
        data: Option<PathBuf>,
        /// Where to write the aligned series CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Validate config and stop before loading data
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for the configured symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            data,
            output,
            dry_run,
        } => run_backtest_command(
            &config,
            symbol.as_deref(),
            data.as_ref(),
            output.as_ref(),
            dry_run,
        ),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = BacktestError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Build the pipeline parameters from a validated config.
pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, BacktestError> {
    let short_window =
        adapter.get_int("backtest", "short_window", DEFAULT_SHORT_WINDOW as i64) as usize;
    let long_window =
        adapter.get_int("backtest", "long_window", DEFAULT_LONG_WINDOW as i64) as usize;
    let initial_cash = adapter.get_double("backtest", "initial_cash", DEFAULT_INITIAL_CASH);

    let short_series_policy = match adapter.get_string("backtest", "on_short_series") {
        None => ShortSeriesPolicy::default(),
        Some(value) => match value.to_lowercase().as_str() {
            "error" => ShortSeriesPolicy::Error,
            "flat" => ShortSeriesPolicy::RunFlat,
            other => {
                return Err(BacktestError::ConfigInvalid {
                    section: "backtest".into(),
                    key: "on_short_series".into(),
                    reason: format!("expected 'error' or 'flat', got '{other}'"),
                })
            }
        },
    };

    let config = BacktestConfig {
        short_window,
        long_window,
        initial_cash,
        short_series_policy,
    };
    config.validate()?;
    Ok(config)
}

/// Optional `[backtest] start_date` / `end_date` bounds.
pub fn build_date_range(
    adapter: &dyn ConfigPort,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), BacktestError> {
    let parse = |key: &str| -> Result<Option<NaiveDate>, BacktestError> {
        match adapter.get_string("backtest", key) {
            None => Ok(None),
            Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d").map(Some).map_err(
                |_| BacktestError::ConfigInvalid {
                    section: "backtest".into(),
                    key: key.into(),
                    reason: "invalid date format (expected YYYY-MM-DD)".into(),
                },
            ),
        }
    };
    Ok((parse("start_date")?, parse("end_date")?))
}

pub fn resolve_symbol(symbol_override: Option<&str>, config: &dyn ConfigPort) -> Option<String> {
    if let Some(s) = symbol_override {
        return Some(s.to_string());
    }
    config
        .get_string("data", "symbol")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn resolve_data_path(data_override: Option<&PathBuf>, config: &dyn ConfigPort) -> Option<PathBuf> {
    if let Some(p) = data_override {
        return Some(p.clone());
    }
    config.get_string("data", "path").map(PathBuf::from)
}

fn run_backtest_command(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    data_override: Option<&PathBuf>,
    output_path: Option<&PathBuf>,
    dry_run: bool,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Build pipeline parameters
    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let (start, end) = match build_date_range(&adapter) {
        Ok(range) => range,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbol = match resolve_symbol(symbol_override, &adapter) {
        Some(s) => s,
        None => {
            eprintln!("error: no symbol configured (use --symbol or set [data] symbol)");
            return ExitCode::from(2);
        }
    };

    if dry_run {
        eprintln!(
            "Dry run: SMA({}) x SMA({}), initial cash {:.2}, symbol {}",
            bt_config.short_window, bt_config.long_window, bt_config.initial_cash, symbol
        );
        eprintln!("Configuration is valid");
        return ExitCode::SUCCESS;
    }

    // Stage 3: Fetch prices
    let data_path = match resolve_data_path(data_override, &adapter) {
        Some(p) => p,
        None => {
            eprintln!("error: no data path configured");
            return ExitCode::from(2);
        }
    };

    let data_port = CsvAdapter::new(data_path);
    let points = match data_port.fetch_prices(&symbol, start, end) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let prices = match PriceSeries::new(points) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Running backtest: {} bars, SMA({}) x SMA({})",
        prices.len(),
        bt_config.short_window,
        bt_config.long_window
    );

    // Stage 4: Run pipeline
    let result = match backtest::run_backtest(prices, &bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Console summary
    let trades = result
        .transitions
        .iter()
        .filter(|&&t| t != crate::domain::signal::Transition::None)
        .count();
    eprintln!("\n=== Results ({symbol}) ===");
    eprintln!("Signals fired:         {trades}");
    println!("Final Portfolio Value: ${:.2}", result.report.final_value);
    println!("Total Profit/Loss:     ${:.2}", result.report.profit_loss);
    println!("Maximum Drawdown:      ${:.2}", result.report.max_drawdown);

    // Stage 6: Export series for rendering
    let output = output_path
        .cloned()
        .or_else(|| adapter.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("series.csv"));

    match CsvReportAdapter::new().write(&result, &output) {
        Ok(()) => {
            eprintln!("\nSeries written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write series: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    match build_backtest_config(&adapter) {
        Ok(config) => {
            eprintln!(
                "  windows: SMA({}) x SMA({})",
                config.short_window, config.long_window
            );
            eprintln!("  initial cash: {:.2}", config.initial_cash);
            eprintln!("Configuration is valid");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_path = match resolve_data_path(None, &adapter) {
        Some(p) => p,
        None => {
            eprintln!("error: no data path configured");
            return ExitCode::from(2);
        }
    };

    let data_port = CsvAdapter::new(data_path);
    match data_port.list_symbols() {
        Ok(symbols) if symbols.is_empty() => {
            eprintln!("No symbols found");
            ExitCode::SUCCESS
        }
        Ok(symbols) => {
            for symbol in &symbols {
                println!("{symbol}");
            }
            eprintln!("{} symbols found", symbols.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(config_path: &PathBuf, symbol_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let symbol = match resolve_symbol(symbol_override, &adapter) {
        Some(s) => s,
        None => {
            eprintln!("error: no symbol configured (use --symbol or set [data] symbol)");
            return ExitCode::from(2);
        }
    };

    let data_path = match resolve_data_path(None, &adapter) {
        Some(p) => p,
        None => {
            eprintln!("error: no data path configured");
            return ExitCode::from(2);
        }
    };

    let data_port = CsvAdapter::new(data_path);
    match data_port.data_range(&symbol) {
        Ok(Some((first, last, count))) => {
            println!("{symbol}: {count} bars, {first} to {last}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{symbol}: no data found");
            ExitCode::from(3)
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
