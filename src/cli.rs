//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use crate::adapters::csv_adapter::CsvPriceProvider;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::{JsonReportAdapter, TextReportAdapter};
use crate::domain::backtest::{run_backtest, BacktestConfig};
use crate::domain::config_validation::{validate_portfolio_config, validate_run_config};
use crate::domain::error::QuantlabError;
use crate::domain::metrics::Metrics;
use crate::domain::portfolio::{simulate_equal_weight, Rebalancing, MIN_PORTFOLIO_ASSETS};
use crate::domain::predict::linear_extrapolation;
use crate::domain::report::{DailyReport, PortfolioDiagnostics};
use crate::domain::signal::{buy_and_hold, momentum};
use crate::domain::table::fetch_table;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{Interval, PriceProvider};
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "quantlab", about = "Retrospective trading strategy evaluator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest a single-asset strategy
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        /// Strategy: buy-and-hold or momentum
        #[arg(long, default_value = "buy-and-hold")]
        strategy: String,
        /// Momentum lookback in periods
        #[arg(long, default_value_t = 14)]
        lookback: usize,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, default_value = "1d")]
        interval: String,
    },
    /// Simulate an equal-weight portfolio with rebalancing
    Portfolio {
        #[arg(short, long)]
        config: PathBuf,
        /// Comma-separated symbols (minimum 3)
        #[arg(long)]
        symbols: String,
        /// Rebalancing cadence: none, weekly or monthly
        #[arg(long, default_value = "monthly")]
        rebalancing: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Extrapolate a linear baseline past the last observation
    Predict {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value_t = 30)]
        horizon: usize,
        #[arg(long, default_value_t = 60)]
        lookback: usize,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Generate a daily watchlist report
    Report {
        #[arg(short, long)]
        config: PathBuf,
        /// Comma-separated symbols; defaults to every symbol in the data directory
        #[arg(long)]
        symbols: Option<String>,
        #[arg(short, long)]
        output: PathBuf,
        /// Write JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            strategy,
            lookback,
            start,
            end,
            interval,
        } => run_single_asset(
            &config, &symbol, &strategy, lookback, start.as_deref(), end.as_deref(), &interval,
        ),
        Command::Portfolio {
            config,
            symbols,
            rebalancing,
            start,
            end,
        } => run_portfolio(
            &config,
            &symbols,
            &rebalancing,
            start.as_deref(),
            end.as_deref(),
        ),
        Command::Predict {
            config,
            symbol,
            horizon,
            lookback,
            start,
            end,
        } => run_predict(
            &config,
            &symbol,
            horizon,
            lookback,
            start.as_deref(),
            end.as_deref(),
        ),
        Command::Report {
            config,
            symbols,
            output,
            json,
        } => run_report(&config, symbols.as_deref(), &output, json),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = QuantlabError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Comma-separated symbol list: trimmed, uppercased, duplicates rejected.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, QuantlabError> {
    let mut symbols = Vec::new();
    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(QuantlabError::InvalidParameter {
                name: "symbols".into(),
                reason: "empty token in symbol list".into(),
            });
        }
        let symbol = trimmed.to_uppercase();
        if symbols.contains(&symbol) {
            return Err(QuantlabError::InvalidParameter {
                name: "symbols".into(),
                reason: format!("duplicate symbol: {symbol}"),
            });
        }
        symbols.push(symbol);
    }
    Ok(symbols)
}

pub fn build_run_config(adapter: &dyn ConfigPort) -> BacktestConfig {
    BacktestConfig {
        initial_capital: adapter.get_double("run", "initial_capital", 10_000.0),
        risk_free_per_period: adapter.get_double("run", "risk_free_per_period", 0.0),
        periods_per_year: adapter.get_double("run", "periods_per_year", 252.0),
    }
}

fn resolve_provider(adapter: &dyn ConfigPort) -> Result<CsvPriceProvider, QuantlabError> {
    let path = adapter
        .get_string("data", "path")
        .ok_or_else(|| QuantlabError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    Ok(CsvPriceProvider::new(PathBuf::from(path)))
}

fn resolve_dates(
    adapter: &dyn ConfigPort,
    start_override: Option<&str>,
    end_override: Option<&str>,
) -> Result<(NaiveDate, NaiveDate), QuantlabError> {
    let start = resolve_date(adapter, "start_date", start_override, NaiveDate::MIN)?;
    let end = resolve_date(adapter, "end_date", end_override, NaiveDate::MAX)?;
    Ok((start, end))
}

fn resolve_date(
    adapter: &dyn ConfigPort,
    key: &str,
    override_value: Option<&str>,
    default: NaiveDate,
) -> Result<NaiveDate, QuantlabError> {
    let value = override_value
        .map(str::to_string)
        .or_else(|| adapter.get_string("run", key));
    match value {
        None => Ok(default),
        Some(s) => {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| QuantlabError::InvalidParameter {
                name: key.to_string(),
                reason: format!("invalid date: {s} (expected YYYY-MM-DD)"),
            })
        }
    }
}

fn run_single_asset(
    config_path: &PathBuf,
    symbol: &str,
    strategy: &str,
    lookback: usize,
    start: Option<&str>,
    end: Option<&str>,
    interval: &str,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let result = (|| -> Result<(), QuantlabError> {
        let interval = Interval::from_str(interval)?;
        let (start, end) = resolve_dates(&adapter, start, end)?;
        let run_config = build_run_config(&adapter);
        let provider = resolve_provider(&adapter)?;

        eprintln!("Fetching {symbol} ({})...", interval.as_str());
        let prices = provider.fetch_prices(symbol, start, end, interval)?;
        eprintln!("  {} observations", prices.len());

        let positions = match strategy {
            "buy-and-hold" => buy_and_hold(&prices),
            "momentum" => momentum(&prices, lookback)?,
            other => {
                return Err(QuantlabError::InvalidParameter {
                    name: "strategy".into(),
                    reason: format!("expected buy-and-hold or momentum, got {other}"),
                });
            }
        };

        let equity = run_backtest(&prices, &positions, run_config.initial_capital)?;
        let metrics = Metrics::compute(
            &equity,
            run_config.periods_per_year,
            run_config.risk_free_per_period,
        );

        println!("Strategy:      {strategy}");
        print_metrics(&metrics);
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_portfolio(
    config_path: &PathBuf,
    symbols: &str,
    rebalancing: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_portfolio_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let result = (|| -> Result<(), QuantlabError> {
        let symbols = parse_symbols(symbols)?;
        let rebalancing = Rebalancing::from_str(rebalancing)?;
        let (start, end) = resolve_dates(&adapter, start, end)?;
        let run_config = build_run_config(&adapter);
        let provider = resolve_provider(&adapter)?;

        eprintln!("Fetching {} symbols...", symbols.len());
        let fetched = fetch_table(
            &provider,
            &symbols,
            start,
            end,
            Interval::D1,
            MIN_PORTFOLIO_ASSETS,
        )?;
        let table = fetched.table;

        let rebalanced = simulate_equal_weight(&table, rebalancing, run_config.initial_capital)?;
        let benchmark =
            simulate_equal_weight(&table, Rebalancing::None, run_config.initial_capital)?;

        println!(
            "Portfolio ({} assets, {} rebalancing)",
            table.asset_count(),
            rebalancing.as_str()
        );
        let metrics = Metrics::compute(
            &rebalanced,
            run_config.periods_per_year,
            run_config.risk_free_per_period,
        );
        print_metrics(&metrics);

        println!();
        println!("Benchmark (no rebalancing)");
        let bench_metrics = Metrics::compute(
            &benchmark,
            run_config.periods_per_year,
            run_config.risk_free_per_period,
        );
        print_metrics(&bench_metrics);

        println!();
        println!("Asset growth (rebased to 1.0)");
        let normalized = table.normalized_columns();
        for (symbol, column) in table.symbols().iter().zip(&normalized) {
            let last = column.last().copied().unwrap_or(1.0);
            println!("  {symbol:<12} {last:.4}");
        }

        let diagnostics =
            PortfolioDiagnostics::compute(&table.returns(), run_config.periods_per_year);
        print_diagnostics(&diagnostics);

        if !fetched.skipped.is_empty() {
            println!();
            println!("Skipped symbols:");
            for skip in &fetched.skipped {
                println!("  {}: {}", skip.symbol, skip.reason);
            }
        }
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_predict(
    config_path: &PathBuf,
    symbol: &str,
    horizon: usize,
    lookback: usize,
    start: Option<&str>,
    end: Option<&str>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let result = (|| -> Result<(), QuantlabError> {
        let (start, end) = resolve_dates(&adapter, start, end)?;
        let provider = resolve_provider(&adapter)?;
        let prices = provider.fetch_prices(symbol, start, end, Interval::D1)?;

        let prediction = linear_extrapolation(&prices, horizon, lookback)?;

        println!("Linear baseline for {symbol} (lookback {lookback}, horizon {horizon})");
        for (date, value) in prediction.dates.iter().zip(&prediction.values) {
            println!("  {date}  {value:.4}");
        }
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // A short series makes the baseline unavailable, not fatal.
            eprintln!("prediction unavailable: {e}");
            (&e).into()
        }
    }
}

fn run_report(
    config_path: &PathBuf,
    symbols: Option<&str>,
    output: &PathBuf,
    json: bool,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let result = (|| -> Result<(), QuantlabError> {
        let run_config = build_run_config(&adapter);
        let provider = resolve_provider(&adapter)?;

        let symbols = match symbols {
            Some(s) => parse_symbols(s)?,
            None => provider.list_symbols()?,
        };
        if symbols.is_empty() {
            return Err(QuantlabError::DataUnavailable {
                symbol: "(watchlist)".into(),
                reason: "no symbols to report on".into(),
            });
        }

        let today = chrono::Local::now().date_naive();
        let mut report = DailyReport::new(today);

        eprintln!("Collecting data for {} symbols...", symbols.len());
        for symbol in &symbols {
            match provider.fetch_prices(symbol, NaiveDate::MIN, today, Interval::D1) {
                Ok(series) => report.add_asset(&series, run_config.periods_per_year),
                Err(e) => {
                    eprintln!("  {symbol}: {e}");
                    report.add_failure(symbol, &e.to_string());
                }
            }
        }

        if json {
            JsonReportAdapter.write(&report, output)?;
        } else {
            TextReportAdapter.write(&report, output)?;
        }
        eprintln!(
            "Wrote report for {} assets ({} failures) to {}",
            report.asset_count(),
            report.failures.len(),
            output.display()
        );
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
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

    let result = (|| -> Result<(), QuantlabError> {
        let provider = resolve_provider(&adapter)?;
        for symbol in provider.list_symbols()? {
            println!("{symbol}");
        }
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn print_metrics(metrics: &Metrics) {
    println!("  Total return:  {:+.2}%", metrics.total_return * 100.0);
    println!("  Sharpe ratio:  {:.3}", metrics.sharpe_ratio);
    println!("  Max drawdown:  {:.2}%", metrics.max_drawdown * 100.0);
    println!("  Final value:   {:.2}", metrics.final_value);
}

fn print_diagnostics(diagnostics: &PortfolioDiagnostics) {
    println!();
    println!("Correlation matrix");
    print!("{:<12}", "");
    for symbol in &diagnostics.symbols {
        print!("{symbol:>10}");
    }
    println!();
    for (i, symbol) in diagnostics.symbols.iter().enumerate() {
        print!("{symbol:<12}");
        for value in &diagnostics.correlation[i] {
            print!("{value:>10.3}");
        }
        println!();
    }

    println!();
    println!("Annualized volatility");
    for (symbol, vol) in diagnostics
        .symbols
        .iter()
        .zip(&diagnostics.annualized_volatility)
    {
        println!("  {symbol:<12} {:.2}%", vol * 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn parse_symbols_basic() {
        let result = parse_symbols("aapl, MSFT ,googl").unwrap();
        assert_eq!(result, vec!["AAPL", "MSFT", "GOOGL"]);
    }

    #[test]
    fn parse_symbols_rejects_empty_token() {
        assert!(parse_symbols("AAPL,,MSFT").is_err());
    }

    #[test]
    fn parse_symbols_rejects_duplicates() {
        assert!(parse_symbols("AAPL,MSFT,aapl").is_err());
    }

    #[test]
    fn run_config_defaults() {
        let adapter = FileConfigAdapter::from_string("[run]\n").unwrap();
        let config = build_run_config(&adapter);
        assert_eq!(config.initial_capital, 10_000.0);
        assert_eq!(config.periods_per_year, 252.0);
        assert_eq!(config.risk_free_per_period, 0.0);
    }

    #[test]
    fn resolve_dates_prefers_overrides() {
        let adapter =
            FileConfigAdapter::from_string("[run]\nstart_date = 2023-01-01\n").unwrap();
        let (start, end) = resolve_dates(&adapter, Some("2024-02-01"), None).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::MAX);
    }

    #[test]
    fn resolve_dates_falls_back_to_config() {
        let adapter =
            FileConfigAdapter::from_string("[run]\nstart_date = 2023-01-01\n").unwrap();
        let (start, _) = resolve_dates(&adapter, None, None).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    }

    #[test]
    fn resolve_dates_reports_bad_override() {
        let adapter = FileConfigAdapter::from_string("[run]\n").unwrap();
        assert!(resolve_dates(&adapter, Some("garbage"), None).is_err());
    }
}
