//! CLI definition and dispatch.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::clock::SystemClock;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    get_number, require_number, validate_kind, validate_market_config, TRADES_SECTION,
};
use crate::domain::error::{MarketError, ValidationError};
use crate::domain::instrument::{Instrument, InstrumentKind, KindName, VWAP_WINDOW_MINUTES};
use crate::domain::market::Market;
use crate::logging::LogFormat;
use crate::ports::clock_port::Clock;
use crate::ports::config_port::ConfigPort;
use crate::ports::trade_port::TradePort;

#[derive(Parser, Debug)]
#[command(name = "gbce", about = "Trade ledger and stock valuation metrics")]
pub struct Cli {
    /// Diagnostic output format: pretty, compact or json
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a market configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List configured instruments
    Instruments {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Dividend yield for a given price
    Yield {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long, allow_negative_numbers = true)]
        price: f64,
    },
    /// Price/earnings ratio for a given price
    Pe {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long, allow_negative_numbers = true)]
        price: f64,
    },
    /// Volume-weighted price over the trailing 15 minutes
    Vwap {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        trades: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
        /// RFC 3339 instant; defaults to now
        #[arg(long)]
        as_of: Option<String>,
    },
    /// All-share composite index
    Index {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        trades: Option<PathBuf>,
        /// RFC 3339 instant; defaults to now
        #[arg(long)]
        as_of: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    run_with_clock(cli, &SystemClock)
}

pub fn run_with_clock(cli: Cli, clock: &dyn Clock) -> ExitCode {
    let result = match cli.command {
        Command::Validate { config } => run_validate(&config),
        Command::Instruments { config } => run_instruments(&config),
        Command::Yield {
            config,
            symbol,
            price,
        } => run_yield(&config, &symbol, price),
        Command::Pe {
            config,
            symbol,
            price,
        } => run_pe(&config, &symbol, price),
        Command::Vwap {
            config,
            trades,
            symbol,
            as_of,
        } => run_vwap(
            &config,
            trades.as_deref(),
            symbol.as_deref(),
            as_of.as_deref(),
            clock,
        ),
        Command::Index {
            config,
            trades,
            as_of,
        } => run_index(&config, trades.as_deref(), as_of.as_deref(), clock),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, MarketError> {
    tracing::info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

pub fn build_instrument(config: &dyn ConfigPort, symbol: &str) -> Result<Instrument, MarketError> {
    let kind = match validate_kind(config, symbol)? {
        KindName::Common => InstrumentKind::Common,
        KindName::Preferred => InstrumentKind::Preferred {
            fixed_dividend_rate: require_number(config, symbol, "fixed_dividend")?,
        },
    };
    let last_dividend = get_number(config, symbol, "last_dividend")?.unwrap_or(0.0);
    let par_value = require_number(config, symbol, "par_value")?;

    Ok(Instrument::new(symbol, kind, last_dividend, par_value)?)
}

/// Validates the configuration and registers every configured instrument.
pub fn build_market(config: &dyn ConfigPort) -> Result<Market, MarketError> {
    let symbols = validate_market_config(config)?;
    let mut market = Market::new();
    for symbol in &symbols {
        market.register(build_instrument(config, symbol)?);
    }
    Ok(market)
}

/// `--trades` wins over `[trades] path`.
pub fn resolve_trades_dir(trades_override: Option<&Path>, config: &dyn ConfigPort) -> Option<PathBuf> {
    trades_override
        .map(Path::to_path_buf)
        .or_else(|| config.get_string(TRADES_SECTION, "path").map(PathBuf::from))
}

/// Records every instrument's trades from `port`. An instrument with no trade
/// history is skipped with a warning unless `required` is set; any other
/// failure aborts the load.
pub fn load_trades(
    port: &dyn TradePort,
    market: &Market,
    required: bool,
) -> Result<usize, MarketError> {
    let mut total = 0;
    for instrument in market.instruments() {
        let trades = match port.fetch_trades(instrument.symbol()) {
            Ok(trades) => trades,
            Err(e @ MarketError::TradesNotFound { .. }) if !required => {
                tracing::warn!(symbol = instrument.symbol(), error = %e, "skipping trades");
                continue;
            }
            Err(e) => return Err(e),
        };
        total += trades.len();
        for trade in trades {
            instrument.record_trade(trade);
        }
    }
    tracing::info!(trades = total, instruments = market.len(), "trades loaded");
    Ok(total)
}

pub fn resolve_as_of(as_of: Option<&str>, clock: &dyn Clock) -> Result<DateTime<Utc>, MarketError> {
    match as_of {
        None => Ok(clock.now()),
        Some(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| {
                MarketError::from(ValidationError::new(
                    "as_of",
                    format!("invalid RFC 3339 timestamp '{}': {}", s, e),
                ))
            }),
    }
}

pub fn find_instrument<'a>(market: &'a Market, symbol: &str) -> Result<&'a Instrument, MarketError> {
    let symbol = symbol.trim().to_uppercase();
    market
        .get(&symbol)
        .ok_or(MarketError::UnknownSymbol { symbol })
}

/// Windowed price per instrument, optionally restricted to one symbol.
pub fn vwap_report(
    market: &Market,
    symbol: Option<&str>,
    as_of: DateTime<Utc>,
) -> Result<Vec<(String, Option<f64>)>, MarketError> {
    match symbol {
        Some(s) => {
            let instrument = find_instrument(market, s)?;
            Ok(vec![(
                instrument.symbol().to_string(),
                instrument.volume_weighted_price(as_of),
            )])
        }
        None => Ok(market
            .instruments()
            .iter()
            .map(|i| (i.symbol().to_string(), i.volume_weighted_price(as_of)))
            .collect()),
    }
}

pub fn format_price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "n/a".to_string(),
    }
}

fn load_market_with_trades(
    config_path: &Path,
    trades_override: Option<&Path>,
) -> Result<Market, MarketError> {
    let config = load_config(config_path)?;
    let market = build_market(&config)?;
    match resolve_trades_dir(trades_override, &config) {
        Some(dir) => {
            let required = config.get_bool(TRADES_SECTION, "required")?.unwrap_or(false);
            load_trades(&CsvAdapter::new(dir), &market, required)?;
        }
        None => tracing::warn!("no trade directory configured; ledgers are empty"),
    }
    Ok(market)
}

fn run_validate(config_path: &Path) -> Result<(), MarketError> {
    let config = load_config(config_path)?;
    let symbols = validate_market_config(&config)?;
    println!("Configuration is valid: {} instruments ({})", symbols.len(), symbols.join(", "));
    Ok(())
}

fn run_instruments(config_path: &Path) -> Result<(), MarketError> {
    let config = load_config(config_path)?;
    let market = build_market(&config)?;
    for instrument in market.instruments() {
        let fixed = match instrument.kind() {
            InstrumentKind::Common => String::from("-"),
            InstrumentKind::Preferred {
                fixed_dividend_rate,
            } => format!("{:.2}%", fixed_dividend_rate * 100.0),
        };
        println!(
            "{}\t{}\tlast_dividend={}\tfixed_dividend={}\tpar_value={}",
            instrument.symbol(),
            instrument.kind(),
            instrument.last_dividend(),
            fixed,
            instrument.par_value(),
        );
    }
    Ok(())
}

fn run_yield(config_path: &Path, symbol: &str, price: f64) -> Result<(), MarketError> {
    let config = load_config(config_path)?;
    let market = build_market(&config)?;
    let instrument = find_instrument(&market, symbol)?;
    let dividend_yield = instrument.dividend_yield(price)?;
    println!("{}", dividend_yield);
    Ok(())
}

fn run_pe(config_path: &Path, symbol: &str, price: f64) -> Result<(), MarketError> {
    let config = load_config(config_path)?;
    let market = build_market(&config)?;
    let instrument = find_instrument(&market, symbol)?;
    let ratio = instrument.price_earnings_ratio(price)?;
    println!("{}", ratio);
    Ok(())
}

fn run_vwap(
    config_path: &Path,
    trades_override: Option<&Path>,
    symbol: Option<&str>,
    as_of: Option<&str>,
    clock: &dyn Clock,
) -> Result<(), MarketError> {
    let as_of = resolve_as_of(as_of, clock)?;
    let market = load_market_with_trades(config_path, trades_override)?;
    tracing::info!(%as_of, window_minutes = VWAP_WINDOW_MINUTES, "computing volume-weighted prices");
    for (symbol, price) in vwap_report(&market, symbol, as_of)? {
        let last_trade = market
            .get(&symbol)
            .and_then(|i| i.last_trade())
            .map(|t| t.occurred_at().to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        println!("{}\t{}\tlast_trade={}", symbol, format_price(price), last_trade);
    }
    Ok(())
}

fn run_index(
    config_path: &Path,
    trades_override: Option<&Path>,
    as_of: Option<&str>,
    clock: &dyn Clock,
) -> Result<(), MarketError> {
    let as_of = resolve_as_of(as_of, clock)?;
    let market = load_market_with_trades(config_path, trades_override)?;
    tracing::info!(%as_of, instruments = market.len(), "computing composite index");
    println!("{:.4}", market.composite_index(as_of));
    Ok(())
}
