//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::TextReportAdapter;
use crate::domain::config_validation::{DEFAULT_STATUS_LOOKBACK, validate_config};
use crate::domain::error::TrendSignalError;
use crate::domain::signal::SignalParams;
use crate::domain::simulator::{self, BacktestConfig, BacktestResult};
use crate::domain::status::{self, ErrorReport, StatusOutcome, StatusReport};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(
    name = "trendsignal",
    about = "Moving-average trend signals and backtests over daily price data"
)]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory holding one {TICKER}.csv per instrument
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate the latest bar of a ticker
    Status {
        #[arg(short, long)]
        ticker: Option<String>,
        /// Use this price instead of the last close
        #[arg(long, value_parser = parse_price)]
        price: Option<f64>,
        /// Print the JSON payload instead of text
        #[arg(long)]
        json: bool,
    },
    /// Replay the strategy over a ticker's history
    Backtest {
        #[arg(short, long)]
        ticker: Option<String>,
        #[arg(long, value_parser = parse_price)]
        initial_capital: Option<f64>,
        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Omit the per-trade log
        #[arg(long)]
        summary_only: bool,
    },
    /// List tickers available in the data directory
    ListTickers,
    /// Show data range for one or all tickers
    Info {
        #[arg(short, long)]
        ticker: Option<String>,
    },
}

fn parse_price(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|e| format!("invalid number '{raw}': {e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("{raw} must be a positive number"))
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    init_tracing(&config);

    let data_dir = resolve_data_dir(cli.data_dir.as_deref(), &config);
    debug!(data_dir = %data_dir.display(), "using CSV data directory");
    let data_port = CsvAdapter::new(data_dir);

    match cli.command {
        Command::Status {
            ticker,
            price,
            json,
        } => run_status(&data_port, &config, ticker.as_deref(), price, json),
        Command::Backtest {
            ticker,
            initial_capital,
            output,
            summary_only,
        } => run_backtest(
            &data_port,
            &config,
            ticker.as_deref(),
            initial_capital,
            output.as_deref(),
            summary_only,
        ),
        Command::ListTickers => finish(run_list_tickers(&data_port)),
        Command::Info { ticker } => finish(run_info(&data_port, ticker.as_deref())),
    }
}

/// Reads and validates the config file; no path means built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, TrendSignalError> {
    let adapter = match path {
        Some(path) => FileConfigAdapter::from_file(path)?,
        None => FileConfigAdapter::empty(),
    };
    validate_config(&adapter)?;
    Ok(adapter)
}

/// `RUST_LOG` wins over `[general] log_level`. Logs go to stderr.
pub fn init_tracing(config: &dyn ConfigPort) {
    let level = config
        .get_string("general", "log_level")
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let format = config
        .get_string("general", "log_format")
        .unwrap_or_default()
        .to_lowercase();

    let builder = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter);
    let installed = match format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    };
    if let Err(e) = installed {
        debug!(error = %e, "tracing subscriber already installed, keeping it");
    }
}

pub fn resolve_data_dir(flag: Option<&Path>, config: &dyn ConfigPort) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| config.get_string("data", "directory").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn build_signal_params(config: &dyn ConfigPort) -> SignalParams {
    let defaults = SignalParams::default();
    SignalParams {
        dip_threshold: config.get_double("signal", "dip_threshold", defaults.dip_threshold),
        rsi_oversold: config.get_double("signal", "rsi_oversold", defaults.rsi_oversold),
        rsi_overbought: config.get_double("signal", "rsi_overbought", defaults.rsi_overbought),
        fib_tolerance: config.get_double("signal", "fib_tolerance", defaults.fib_tolerance),
    }
}

/// `[backtest]` settings; the dip threshold is shared with `[signal]`.
pub fn build_backtest_config(
    config: &dyn ConfigPort,
    initial_capital: Option<f64>,
) -> BacktestConfig {
    let defaults = BacktestConfig::default();
    BacktestConfig {
        initial_capital: initial_capital.unwrap_or_else(|| {
            config.get_double("backtest", "initial_capital", defaults.initial_capital)
        }),
        lot_size: config.get_double("backtest", "lot_size", defaults.lot_size),
        dip_threshold: config.get_double("signal", "dip_threshold", defaults.dip_threshold),
        lookback: lookback(config, "backtest", defaults.lookback as i64),
    }
}

pub fn status_lookback(config: &dyn ConfigPort) -> usize {
    lookback(config, "status", DEFAULT_STATUS_LOOKBACK)
}

fn lookback(config: &dyn ConfigPort, section: &str, default: i64) -> usize {
    config.get_int(section, "lookback", default).max(1) as usize
}

pub fn require_ticker(ticker: Option<&str>) -> Result<String, TrendSignalError> {
    match ticker.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_uppercase()),
        _ => Err(TrendSignalError::MissingInput {
            field: "ticker".to_string(),
        }),
    }
}

pub fn execute_status(
    data_port: &dyn DataPort,
    ticker: Option<&str>,
    price: Option<f64>,
    params: &SignalParams,
    lookback: usize,
) -> Result<StatusOutcome, TrendSignalError> {
    let ticker = require_ticker(ticker)?;
    let series = data_port.fetch_series(&ticker, lookback)?;
    info!(ticker = %ticker, bars = series.len(), "evaluating status");
    let outcome = status::evaluate_status(&series, price, params)?;
    info!(
        ticker = %ticker,
        decision = %outcome.decision.action,
        price = outcome.current_price,
        "status evaluated"
    );
    Ok(outcome)
}

pub fn execute_backtest(
    data_port: &dyn DataPort,
    ticker: Option<&str>,
    config: &BacktestConfig,
) -> Result<BacktestResult, TrendSignalError> {
    let ticker = require_ticker(ticker)?;
    let series = data_port.fetch_series(&ticker, config.lookback)?;
    info!(
        ticker = %ticker,
        bars = series.len(),
        initial_capital = config.initial_capital,
        "running backtest"
    );
    let result = simulator::run_backtest(&series, config)?;
    info!(
        ticker = %ticker,
        days = result.daily_values.len(),
        trades = result.ledger.trades.len(),
        final_value = result.final_value,
        "backtest complete"
    );
    Ok(result)
}

pub fn render_status_text(outcome: &StatusOutcome) -> String {
    let report = StatusReport::from(outcome);
    let fmt = |value: Option<f64>| value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));

    let mut out = format!("{} as of {}\n", report.ticker, report.as_of);
    out.push_str(&format!("Decision:      {}\n", report.decision));
    out.push_str(&format!("Reason:        {}\n", report.reason));
    out.push_str(&format!("Current price: {:.2}\n", report.current_price));
    out.push_str(&format!(
        "MA_5: {}  MA_25: {}  MA_99: {}\n",
        fmt(report.ma_5),
        fmt(report.ma_25),
        fmt(report.ma_99)
    ));
    out
}

fn run_status(
    data_port: &dyn DataPort,
    config: &dyn ConfigPort,
    ticker: Option<&str>,
    price: Option<f64>,
    json: bool,
) -> ExitCode {
    let params = build_signal_params(config);
    let result = execute_status(data_port, ticker, price, &params, status_lookback(config))
        .and_then(|outcome| {
            let text = if json {
                serde_json::to_string_pretty(&StatusReport::from(&outcome))?
            } else {
                render_status_text(&outcome)
            };
            println!("{}", text.trim_end());
            Ok(())
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                if let Ok(payload) = serde_json::to_string(&ErrorReport::from(&e)) {
                    println!("{payload}");
                }
            }
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_backtest(
    data_port: &dyn DataPort,
    config: &dyn ConfigPort,
    ticker: Option<&str>,
    initial_capital: Option<f64>,
    output: Option<&Path>,
    summary_only: bool,
) -> ExitCode {
    let bt_config = build_backtest_config(config, initial_capital);
    let result = execute_backtest(data_port, ticker, &bt_config)
        .and_then(|result| write_report(&result, output, summary_only));
    finish(result)
}

pub fn write_report(
    result: &BacktestResult,
    output: Option<&Path>,
    summary_only: bool,
) -> Result<(), TrendSignalError> {
    let report = if summary_only {
        TextReportAdapter::summary_only()
    } else {
        TextReportAdapter::new()
    };
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            report.write_backtest(result, &mut writer)?;
            info!(path = %path.display(), "report written");
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            report.write_backtest(result, &mut lock)?;
        }
    }
    Ok(())
}

pub fn run_list_tickers(data_port: &dyn DataPort) -> Result<(), TrendSignalError> {
    let tickers = data_port.list_tickers()?;
    if tickers.is_empty() {
        warn!("no tickers found");
        return Ok(());
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for ticker in &tickers {
        writeln!(out, "{}", ticker)?;
    }
    info!(count = tickers.len(), "tickers listed");
    Ok(())
}

pub fn run_info(data_port: &dyn DataPort, ticker: Option<&str>) -> Result<(), TrendSignalError> {
    let tickers = match ticker {
        Some(_) => vec![require_ticker(ticker)?],
        None => data_port.list_tickers()?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for t in &tickers {
        match data_port.get_data_range(t)? {
            Some((first, last, count)) => {
                writeln!(out, "{}: {} bars, {} to {}", t, count, first, last)?;
            }
            None => warn!(ticker = %t, "no data found"),
        }
    }
    Ok(())
}

fn finish(result: Result<(), TrendSignalError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_price_rejects_non_positive() {
        assert_eq!(parse_price("12.5"), Ok(12.5));
        assert!(parse_price("0").is_err());
        assert!(parse_price("-3").is_err());
        assert!(parse_price("abc").is_err());
        assert!(parse_price("inf").is_err());
    }

    #[test]
    fn require_ticker_trims_and_uppercases() {
        assert_eq!(require_ticker(Some(" aapl ")).unwrap(), "AAPL");
        let err = require_ticker(Some("  ")).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(require_ticker(None).is_err());
    }

    #[test]
    fn init_tracing_twice_keeps_first_subscriber() {
        let config = FileConfigAdapter::empty();
        init_tracing(&config);
        init_tracing(&config);
    }

    #[test]
    fn cli_parses_status_flags() {
        let cli = Cli::try_parse_from([
            "trendsignal",
            "status",
            "--ticker",
            "ACME",
            "--price",
            "101.5",
            "--json",
            "--data-dir",
            "/tmp/prices",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/prices")));
        match cli.command {
            Command::Status {
                ticker,
                price,
                json,
            } => {
                assert_eq!(ticker.as_deref(), Some("ACME"));
                assert_eq!(price, Some(101.5));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_negative_initial_capital() {
        let parsed = Cli::try_parse_from([
            "trendsignal",
            "backtest",
            "--ticker",
            "ACME",
            "--initial-capital",
            "-5",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn cli_parses_backtest_summary_only() {
        let cli = Cli::try_parse_from([
            "trendsignal",
            "backtest",
            "--ticker",
            "ACME",
            "--summary-only",
        ])
        .unwrap();
        match cli.command {
            Command::Backtest {
                summary_only,
                output,
                ..
            } => {
                assert!(summary_only);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parses_list_tickers_and_info() {
        let cli = Cli::try_parse_from(["trendsignal", "list-tickers", "-c", "app.ini"]).unwrap();
        assert!(matches!(cli.command, Command::ListTickers));
        assert_eq!(cli.config, Some(PathBuf::from("app.ini")));

        let cli = Cli::try_parse_from(["trendsignal", "info"]).unwrap();
        assert!(matches!(cli.command, Command::Info { ticker: None }));
    }
}
